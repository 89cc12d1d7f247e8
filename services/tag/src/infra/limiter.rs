use deadpool_redis::Pool;
use deadpool_redis::redis;

use crate::domain::repository::RequestLimiter;
use crate::error::TagServiceError;

#[derive(Clone)]
pub struct RedisRequestLimiter {
    pub pool: Pool,
}

fn window_key(key: &str) -> String {
    format!("ratelimit:{key}")
}

impl RequestLimiter for RedisRequestLimiter {
    async fn hit(&self, key: &str, window_secs: u64) -> Result<u64, TagServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| TagServiceError::Internal(e.into()))?;
        let key = window_key(key);

        // NX keeps the TTL of the first hit so the window is fixed, not sliding.
        let (hits,): (u64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&key)
            .arg(0)
            .arg("EX")
            .arg(window_secs)
            .arg("NX")
            .ignore()
            .cmd("INCR")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| TagServiceError::Internal(e.into()))?;
        Ok(hits)
    }
}
