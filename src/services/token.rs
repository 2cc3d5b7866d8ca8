use std::sync::Arc;
use tokio::sync::Mutex;
use crate::models::Credentials;
use crate::upstream::AnalyticsApi;

/// Holds the single bearer token used for all upstream calls.
///
/// The token is never checked for expiry locally; it is dropped only when
/// the upstream answers 401 or a login fails.
pub struct TokenManager {
    api: Arc<dyn AnalyticsApi>,
    credentials: Credentials,
    token: Mutex<Option<String>>,
}

impl TokenManager {
    pub fn new(api: Arc<dyn AnalyticsApi>, credentials: Credentials) -> Self {
        Self {
            api,
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Returns the held token, logging in first if there is none.
    ///
    /// The lock is held across the login so concurrent callers share one.
    pub async fn ensure_token(&self) -> Option<String> {
        let mut token = self.token.lock().await;
        if token.is_none() {
            *token = self.request_token().await;
        }
        token.clone()
    }

    /// Forces a fresh login, replacing whatever token is held.
    pub async fn login(&self) -> bool {
        let mut token = self.token.lock().await;
        *token = self.request_token().await;
        token.is_some()
    }

    /// Drops `stale` if it is still the held token.
    pub async fn invalidate(&self, stale: &str) {
        let mut token = self.token.lock().await;
        if token.as_deref() == Some(stale) {
            *token = None;
        }
    }

    pub async fn current(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    async fn request_token(&self) -> Option<String> {
        match self.api.login(&self.credentials).await {
            Ok(token) => {
                tracing::info!(username = %self.credentials.username, "logged in to analytics backend");
                Some(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "analytics login failed");
                None
            }
        }
    }
}
