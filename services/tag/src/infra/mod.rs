pub mod clock;
pub mod db;
pub mod gateway;
pub mod limiter;
