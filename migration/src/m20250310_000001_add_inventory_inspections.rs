use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create inventory_items table
        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    // NULL property_id marks a master template item
                    .col(string_null(InventoryItems::PropertyId))
                    .col(string(InventoryItems::Name))
                    .col(string_null(InventoryItems::Category))
                    .col(
                        ColumnDef::new(InventoryItems::CurrentQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::RestockThreshold)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::ReorderQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(string_null(InventoryItems::Supplier))
                    .col(string_null(InventoryItems::MarketplaceUrl))
                    .col(double_null(InventoryItems::UnitCost))
                    .col(string_null(InventoryItems::Notes))
                    .col(big_integer(InventoryItems::CreatedAt))
                    .col(big_integer(InventoryItems::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create index on inventory_items.property_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_items_property")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::PropertyId)
                    .to_owned(),
            )
            .await?;

        // Create inventory_changes table with backend-specific ID type
        let change_id_col = match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => ColumnDef::new(InventoryChanges::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key()
                .to_owned(),
            _ => ColumnDef::new(InventoryChanges::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key()
                .to_owned(),
        };

        manager
            .create_table(
                Table::create()
                    .table(InventoryChanges::Table)
                    .if_not_exists()
                    .col(change_id_col)
                    .col(string(InventoryChanges::ItemId))
                    .col(string_null(InventoryChanges::PropertyId))
                    .col(big_integer(InventoryChanges::Delta))
                    .col(big_integer(InventoryChanges::QuantityAfter))
                    .col(string(InventoryChanges::Reason))
                    .col(string_null(InventoryChanges::ChangedBy))
                    .col(big_integer(InventoryChanges::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create index on inventory_changes.item_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_changes_item")
                    .table(InventoryChanges::Table)
                    .col(InventoryChanges::ItemId)
                    .to_owned(),
            )
            .await?;

        // Create inspection_templates table
        manager
            .create_table(
                Table::create()
                    .table(InspectionTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InspectionTemplates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string_null(InspectionTemplates::PropertyId))
                    .col(string(InspectionTemplates::Name))
                    .col(string(InspectionTemplates::Items))
                    .col(big_integer(InspectionTemplates::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create inspection_records table
        manager
            .create_table(
                Table::create()
                    .table(InspectionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InspectionRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(InspectionRecords::TemplateId))
                    .col(string_null(InspectionRecords::PropertyId))
                    .col(string_null(InspectionRecords::Inspector))
                    .col(string(InspectionRecords::CompletedOn))
                    .col(string_null(InspectionRecords::Notes))
                    .col(big_integer(InspectionRecords::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inspection_records_template")
                            .from(InspectionRecords::Table, InspectionRecords::TemplateId)
                            .to(InspectionTemplates::Table, InspectionTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InspectionRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InspectionTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryChanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    PropertyId,
    Name,
    Category,
    CurrentQuantity,
    RestockThreshold,
    ReorderQuantity,
    Supplier,
    MarketplaceUrl,
    UnitCost,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryChanges {
    Table,
    Id,
    ItemId,
    PropertyId,
    Delta,
    QuantityAfter,
    Reason,
    ChangedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InspectionTemplates {
    Table,
    Id,
    PropertyId,
    Name,
    Items,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InspectionRecords {
    Table,
    Id,
    TemplateId,
    PropertyId,
    Inspector,
    CompletedOn,
    Notes,
    CreatedAt,
}
