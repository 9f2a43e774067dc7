pub mod order;
pub mod product;
pub mod user;

pub use order::Entity as OrderEntity;
pub use product::Entity as ProductEntity;
pub use user::Entity as UserEntity;
