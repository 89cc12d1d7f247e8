use std::sync::Arc;

use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::extract::AdminSecret;
use crate::infra::clock::SystemClock;
use crate::infra::db::{
    DbEmergencyLogRepository, DbOtpRepository, DbProfileRepository, DbQrTagRepository,
};
use crate::infra::gateway::LoggingMessageGateway;
use crate::infra::limiter::RedisRequestLimiter;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub admin_key: AdminSecret,
}

impl AppState {
    pub fn new(db: DatabaseConnection, redis: RedisPool, admin_key: &str) -> Self {
        Self {
            db,
            redis,
            admin_key: AdminSecret(Arc::from(admin_key)),
        }
    }

    pub fn qr_tag_repo(&self) -> DbQrTagRepository {
        DbQrTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn log_repo(&self) -> DbEmergencyLogRepository {
        DbEmergencyLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn limiter(&self) -> RedisRequestLimiter {
        RedisRequestLimiter {
            pool: self.redis.clone(),
        }
    }

    pub fn gateway(&self) -> LoggingMessageGateway {
        LoggingMessageGateway
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}

impl FromRef<AppState> for AdminSecret {
    fn from_ref(state: &AppState) -> Self {
        state.admin_key.clone()
    }
}
