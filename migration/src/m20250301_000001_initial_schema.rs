use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable foreign keys for SQLite; the parent-warranty cascade relies on it
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Sqlite {
            manager
                .get_connection()
                .execute_unprepared("PRAGMA foreign_keys = ON")
                .await?;
        }

        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Properties::Name))
                    .col(string_null(Properties::Address))
                    .col(big_integer(Properties::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create warranties table
        manager
            .create_table(
                Table::create()
                    .table(Warranties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warranties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string_null(Warranties::PropertyId))
                    .col(string_null(Warranties::ParentWarrantyId))
                    .col(string(Warranties::ProductName))
                    .col(string_null(Warranties::Vendor))
                    .col(string_null(Warranties::Manufacturer))
                    .col(string_null(Warranties::ContactInfo))
                    .col(string_null(Warranties::PurchasedFrom))
                    .col(double_null(Warranties::Cost))
                    .col(string_null(Warranties::PurchaseDate))
                    .col(string(Warranties::Duration))
                    .col(big_integer_null(Warranties::CustomDurationDays))
                    .col(string_null(Warranties::ExpirationDate))
                    .col(string(Warranties::Attachments))
                    .col(string_null(Warranties::Notes))
                    .col(string_null(Warranties::CreatedBy))
                    .col(big_integer(Warranties::CreatedAt))
                    .col(big_integer(Warranties::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warranties_property")
                            .from(Warranties::Table, Warranties::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    // Deleting a parent warranty removes its sub-warranties
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warranties_parent")
                            .from(Warranties::Table, Warranties::ParentWarrantyId)
                            .to(Warranties::Table, Warranties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on warranties.property_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_warranties_property")
                    .table(Warranties::Table)
                    .col(Warranties::PropertyId)
                    .to_owned(),
            )
            .await?;

        // Create index on warranties.parent_warranty_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_warranties_parent")
                    .table(Warranties::Table)
                    .col(Warranties::ParentWarrantyId)
                    .to_owned(),
            )
            .await?;

        // Create assets table
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string_null(Assets::PropertyId))
                    .col(string_null(Assets::WarrantyId))
                    .col(string(Assets::Category))
                    .col(string_null(Assets::Brand))
                    .col(string_null(Assets::Model))
                    .col(string_null(Assets::Condition))
                    .col(string_null(Assets::Location))
                    .col(double_null(Assets::Cost))
                    .col(string_null(Assets::Notes))
                    .col(big_integer(Assets::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assets_property")
                            .from(Assets::Table, Assets::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assets_warranty")
                            .from(Assets::Table, Assets::WarrantyId)
                            .to(Warranties::Table, Warranties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create damage_reports table
        manager
            .create_table(
                Table::create()
                    .table(DamageReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DamageReports::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string_null(DamageReports::PropertyId))
                    .col(string(DamageReports::Title))
                    .col(string_null(DamageReports::Description))
                    .col(string(DamageReports::Severity))
                    .col(
                        ColumnDef::new(DamageReports::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(DamageReports::ResponsibleParty)
                            .string()
                            .not_null()
                            .default("unknown"),
                    )
                    .col(string_null(DamageReports::GuestName))
                    .col(string_null(DamageReports::BookingReference))
                    .col(string(DamageReports::PhotoUrls))
                    .col(double_null(DamageReports::EstimatedCost))
                    .col(string_null(DamageReports::Notes))
                    .col(big_integer(DamageReports::CreatedAt))
                    .col(big_integer(DamageReports::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create index on damage_reports.property_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_damage_reports_property")
                    .table(DamageReports::Table)
                    .col(DamageReports::PropertyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DamageReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Warranties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Warranties {
    Table,
    Id,
    PropertyId,
    ParentWarrantyId,
    ProductName,
    Vendor,
    Manufacturer,
    ContactInfo,
    PurchasedFrom,
    Cost,
    PurchaseDate,
    Duration,
    CustomDurationDays,
    ExpirationDate,
    Attachments,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
    PropertyId,
    WarrantyId,
    Category,
    Brand,
    Model,
    Condition,
    Location,
    Cost,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DamageReports {
    Table,
    Id,
    PropertyId,
    Title,
    Description,
    Severity,
    Status,
    ResponsibleParty,
    GuestName,
    BookingReference,
    PhotoUrls,
    EstimatedCost,
    Notes,
    CreatedAt,
    UpdatedAt,
}
