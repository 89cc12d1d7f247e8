//! sea-orm entities for the tag service tables.

pub mod emergency_logs;
pub mod otp_verifications;
pub mod qr_tags;
pub mod vehicle_profiles;
