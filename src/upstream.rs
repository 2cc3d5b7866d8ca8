//! Client for the upstream analytics API.
//!
//! The backend exposes two endpoints the proxy cares about: a login endpoint
//! that trades the account credentials for a bearer token, and a per-website
//! stats endpoint. [`AnalyticsApi`] abstracts both so the session logic can be
//! exercised against a scripted backend.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;

use crate::config::{LOGIN_PATH, STATS_END_AT, STATS_START_AT};
use crate::errors::AnalyticsError;
use crate::models::{Credentials, LoginRequest, LoginResponse, StatsOutcome};

#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Logs in and returns the issued bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, AnalyticsError>;

    /// Fetches all-time stats for one website.
    ///
    /// 5xx responses and network failures are errors; every other status is
    /// reported through [`StatsOutcome`] so the caller decides about retries.
    async fn website_stats(
        &self,
        website_id: &str,
        token: &str,
    ) -> Result<StatsOutcome, AnalyticsError>;
}

#[derive(Debug, Clone)]
pub struct HttpAnalyticsApi {
    client: Client,
    base_url: String,
}

impl HttpAnalyticsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn stats_url(&self, website_id: &str) -> String {
        format!("{}/api/websites/{}/stats", self.base_url, website_id)
    }
}

#[async_trait]
impl AnalyticsApi for HttpAnalyticsApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, AnalyticsError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::AuthenticationFailure(format!(
                "login rejected with status {}",
                status
            )));
        }

        let body: LoginResponse = response.json().await?;
        body.token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AnalyticsError::AuthenticationFailure("no token in login response".to_string())
            })
    }

    async fn website_stats(
        &self,
        website_id: &str,
        token: &str,
    ) -> Result<StatsOutcome, AnalyticsError> {
        let url = self.stats_url(website_id);
        tracing::info!(%url, "fetching visitor stats");

        let response = self
            .client
            .get(&url)
            .query(&[("startAt", STATS_START_AT), ("endAt", STATS_END_AT)])
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AnalyticsError::Transport(format!(
                "upstream server error {}",
                status
            )));
        }

        match status {
            StatusCode::OK => Ok(StatsOutcome::Ok(response.json::<Value>().await?)),
            StatusCode::UNAUTHORIZED => Ok(StatsOutcome::Unauthorized),
            other => Ok(StatsOutcome::Status(other.as_u16())),
        }
    }
}
