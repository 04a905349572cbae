pub use sea_orm_migration::prelude::*;

mod m20250301_000001_initial_schema;
mod m20250310_000001_add_inventory_inspections;
mod m20250324_000001_add_invitations_jobs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_initial_schema::Migration),
            Box::new(m20250310_000001_add_inventory_inspections::Migration),
            Box::new(m20250324_000001_add_invitations_jobs::Migration),
        ]
    }
}
