use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub items: String,
    pub amount: f64,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub status: String,
    pub payment_method: String,
    pub payment: bool,
    /// Stripe checkout session id or Razorpay order id
    pub payment_ref: Option<String>,
    pub date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
