//! Scripted analytics backend for unit tests.
//!
//! Login and stats responses are queued up front and popped per call. When a
//! queue runs dry the fake falls back to a successful default (`"token-N"` for
//! logins, `{"visits": 0}` for stats).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use serde_json::json;
use crate::errors::AnalyticsError;
use crate::models::{Credentials, StatsOutcome};
use crate::services::AnalyticsSession;
use crate::upstream::AnalyticsApi;

#[derive(Default)]
pub struct FakeAnalyticsApi {
    logins: Mutex<VecDeque<Result<String, AnalyticsError>>>,
    stats: Mutex<VecDeque<Result<StatsOutcome, AnalyticsError>>>,
    login_calls: AtomicUsize,
    stats_calls: AtomicUsize,
    stats_tokens: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
}

impl FakeAnalyticsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call sleep first, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_login(&self, result: Result<String, AnalyticsError>) {
        self.logins.lock().unwrap().push_back(result);
    }

    pub fn push_stats(&self, result: Result<StatsOutcome, AnalyticsError>) {
        self.stats.lock().unwrap().push_back(result);
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    /// `(website_id, token)` of every stats call, in order.
    pub fn stats_requests(&self) -> Vec<(String, String)> {
        self.stats_tokens.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AnalyticsApi for FakeAnalyticsApi {
    async fn login(&self, _credentials: &Credentials) -> Result<String, AnalyticsError> {
        let n = self.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pause().await;
        let scripted = self.logins.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(format!("token-{}", n)))
    }

    async fn website_stats(
        &self,
        website_id: &str,
        token: &str,
    ) -> Result<StatsOutcome, AnalyticsError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats_tokens
            .lock()
            .unwrap()
            .push((website_id.to_string(), token.to_string()));
        self.pause().await;
        let scripted = self.stats.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(StatsOutcome::Ok(json!({ "visits": 0 }))))
    }
}

pub fn test_credentials() -> Credentials {
    Credentials {
        base_url: "http://analytics.test".to_string(),
        username: "admin".to_string(),
        password: "secret".to_string(),
    }
}

pub fn session_with(api: &Arc<FakeAnalyticsApi>) -> AnalyticsSession {
    AnalyticsSession::new(api.clone(), test_credentials())
}
