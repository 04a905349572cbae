pub mod asset;
pub mod damage_report;
pub mod inspection_record;
pub mod inspection_template;
pub mod inventory_change;
pub mod inventory_item;
pub mod invitation;
pub mod job_execution;
pub mod property;
pub mod warranty;

pub use asset::Entity as Asset;
pub use damage_report::Entity as DamageReport;
pub use inspection_record::Entity as InspectionRecord;
pub use inspection_template::Entity as InspectionTemplate;
pub use inventory_change::Entity as InventoryChange;
pub use inventory_item::Entity as InventoryItem;
pub use invitation::Entity as Invitation;
pub use job_execution::Entity as JobExecution;
pub use property::Entity as Property;
pub use warranty::Entity as Warranty;
