pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod upstream;

#[cfg(test)]
mod testing;

pub use errors::{AnalyticsError, ConfigError, ProxyError};
pub use models::{AppState, CacheEntry, Credentials};
pub use services::AnalyticsSession;
