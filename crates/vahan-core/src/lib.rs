//! Plumbing shared by Vahan Tag services: tracing setup, the JSON error
//! envelope, health probes, request ids and env-based configuration.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
