use sea_orm::entity::prelude::*;

/// A printed QR tag. Created inactive by an admin, activated out of band.
/// `status` is one of `inactive | active | revoked`; `type` is `vehicle | other`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "qr_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Trimmed, upper-cased code.
    #[sea_orm(unique)]
    pub qr_code: String,
    #[sea_orm(column_name = "type")]
    pub tag_type: String,
    pub status: String,
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::vehicle_profiles::Entity")]
    VehicleProfile,
    #[sea_orm(has_many = "super::emergency_logs::Entity")]
    EmergencyLogs,
}

impl Related<super::vehicle_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleProfile.def()
    }
}

impl Related<super::emergency_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmergencyLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
