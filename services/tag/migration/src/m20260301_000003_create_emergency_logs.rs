use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmergencyLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmergencyLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmergencyLogs::QrTagId).uuid().not_null())
                    .col(
                        ColumnDef::new(EmergencyLogs::ActionType)
                            .string_len(8)
                            .not_null()
                            .check(
                                Expr::col(EmergencyLogs::ActionType)
                                    .is_in(["view", "scan", "call", "sms"]),
                            ),
                    )
                    .col(
                        ColumnDef::new(EmergencyLogs::CallerIp)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmergencyLogs::Table, EmergencyLogs::QrTagId)
                            .to(QrTags::Table, QrTags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Sliding-window throttle lookup.
        manager
            .create_index(
                Index::create()
                    .table(EmergencyLogs::Table)
                    .col(EmergencyLogs::CallerIp)
                    .col(EmergencyLogs::CreatedAt)
                    .name("idx_emergency_logs_caller_ip_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(EmergencyLogs::Table)
                    .col(EmergencyLogs::QrTagId)
                    .name("idx_emergency_logs_qr_tag_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmergencyLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EmergencyLogs {
    Table,
    Id,
    QrTagId,
    ActionType,
    CallerIp,
    CreatedAt,
}

#[derive(Iden)]
enum QrTags {
    Table,
    Id,
}
