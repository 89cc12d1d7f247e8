use sea_orm_migration::prelude::*;

mod m20260301_000001_create_qr_tags;
mod m20260301_000002_create_vehicle_profiles;
mod m20260301_000003_create_emergency_logs;
mod m20260301_000004_create_otp_verifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_qr_tags::Migration),
            Box::new(m20260301_000002_create_vehicle_profiles::Migration),
            Box::new(m20260301_000003_create_emergency_logs::Migration),
            Box::new(m20260301_000004_create_otp_verifications::Migration),
        ]
    }
}
