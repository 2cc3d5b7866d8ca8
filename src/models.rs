use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use crate::config::AliasTable;
use crate::services::AnalyticsSession;

/// Upstream analytics account. Fixed for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct CacheEntry {
    pub payload: Value,
    pub expires_at: Instant,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

/// Result of a stats request that reached the upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome {
    Ok(Value),
    Unauthorized,
    Status(u16),
}

#[derive(Debug, Default, Deserialize)]
pub struct VisitorsQuery {
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// Everything a running instance shares across requests.
pub struct AppState {
    pub session: AnalyticsSession,
    pub aliases: &'static AliasTable,
}

impl AppState {
    pub fn new(session: AnalyticsSession, aliases: &'static AliasTable) -> Self {
        Self { session, aliases }
    }
}
