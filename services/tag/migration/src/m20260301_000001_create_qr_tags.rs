use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QrTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QrTags::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(QrTags::QrCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(QrTags::Type)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(QrTags::Type).is_in(["vehicle", "other"])),
                    )
                    .col(
                        ColumnDef::new(QrTags::Status)
                            .string_len(16)
                            .not_null()
                            .default("inactive")
                            .check(
                                Expr::col(QrTags::Status).is_in(["inactive", "active", "revoked"]),
                            ),
                    )
                    .col(ColumnDef::new(QrTags::ActivatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(QrTags::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(QrTags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QrTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QrTags {
    Table,
    Id,
    QrCode,
    Type,
    Status,
    ActivatedAt,
    ExpiresAt,
    CreatedAt,
}
