pub mod components;
pub mod meals;
pub mod order_items;
pub mod orders;
pub mod tenants;

pub use components::Entity as Components;
pub use meals::Entity as Meals;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use tenants::Entity as Tenants;
