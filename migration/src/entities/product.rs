use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    /// JSON array of image URLs
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub category: String,
    pub sub_category: String,
    /// JSON array of size labels
    #[sea_orm(column_type = "Text")]
    pub sizes: String,
    pub bestseller: bool,
    pub date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
