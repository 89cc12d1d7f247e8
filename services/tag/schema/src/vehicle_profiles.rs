use sea_orm::entity::prelude::*;

/// Owner and vehicle details behind a vehicle tag (at most one per tag).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicle_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub qr_tag_id: Uuid,
    pub vehicle_number: String,
    pub owner_mobile: String,
    pub blood_group: Option<String>,
    pub model: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
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
