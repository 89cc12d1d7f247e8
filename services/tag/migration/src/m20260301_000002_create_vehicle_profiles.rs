use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VehicleProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VehicleProfiles::QrTagId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VehicleProfiles::VehicleNumber)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleProfiles::OwnerMobile)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VehicleProfiles::BloodGroup).string_len(8))
                    .col(ColumnDef::new(VehicleProfiles::Model).string_len(64))
                    .col(
                        ColumnDef::new(VehicleProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VehicleProfiles::Table, VehicleProfiles::QrTagId)
                            .to(QrTags::Table, QrTags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VehicleProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VehicleProfiles {
    Table,
    QrTagId,
    VehicleNumber,
    OwnerMobile,
    BloodGroup,
    Model,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum QrTags {
    Table,
    Id,
}
