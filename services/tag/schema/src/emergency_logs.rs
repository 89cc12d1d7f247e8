use sea_orm::entity::prelude::*;

/// Append-only record of every view/scan/call/sms against a tag.
/// Also the input to per-IP contact throttling.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "emergency_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub qr_tag_id: Uuid,
    pub action_type: String,
    pub caller_ip: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_tags::Entity",
        from = "Column::QrTagId",
        to = "super::qr_tags::Column::Id"
    )]
    QrTag,
}

impl Related<super::qr_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
