pub mod builders;
pub mod db;

pub use builders::{InventoryItemBuilder, PropertyBuilder, WarrantyBuilder};
pub use db::TestDb;
