mod cache;
mod token;

pub use cache::VisitorCache;
pub use token::TokenManager;

use std::collections::HashMap;
use std::sync::Arc;
use serde_json::Value;
use tokio::sync::Mutex;
use crate::config::DEFAULT_AUTH_RETRIES;
use crate::errors::AnalyticsError;
use crate::models::{Credentials, StatsOutcome};
use crate::upstream::AnalyticsApi;


/// Token and cache state of one proxy instance.
pub struct AnalyticsSession {
    api: Arc<dyn AnalyticsApi>,
    tokens: TokenManager,
    cache: VisitorCache,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AnalyticsSession {
    pub fn new(api: Arc<dyn AnalyticsApi>, credentials: Credentials) -> Self {
        Self::with_cache(api, credentials, VisitorCache::default())
    }

    pub fn with_cache(api: Arc<dyn AnalyticsApi>, credentials: Credentials, cache: VisitorCache) -> Self {
        Self {
            tokens: TokenManager::new(api.clone(), credentials),
            api,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn cache(&self) -> &VisitorCache {
        &self.cache
    }

    pub async fn get_visitor_data(&self, website_id: &str) -> Result<Value, AnalyticsError> {
        self.get_visitor_data_with_retries(website_id, DEFAULT_AUTH_RETRIES).await
    }

    /// Serves `website_id` from cache or fetches it upstream.
    ///
    /// A 401 drops the token and retries with a fresh login, at most
    /// `max_retries` times.
    pub async fn get_visitor_data_with_retries(
        &self,
        website_id: &str,
        max_retries: u32,
    ) -> Result<Value, AnalyticsError> {
        if let Some(payload) = self.cache.get(website_id).await {
            tracing::debug!(website_id, "visitor stats served from cache");
            return Ok(payload);
        }

        let slot = self.fetch_slot(website_id).await;
        let _guard = slot.lock().await;

        // another request may have filled the cache while we waited
        if let Some(payload) = self.cache.get(website_id).await {
            tracing::debug!(website_id, "visitor stats served from cache");
            return Ok(payload);
        }

        let mut retries_left = max_retries;
        loop {
            let token = self
                .tokens
                .ensure_token()
                .await
                .ok_or(AnalyticsError::TokenUnavailable)?;

            match self.api.website_stats(website_id, &token).await? {
                StatsOutcome::Ok(payload) => {
                    self.cache.insert(website_id, payload.clone()).await;
                    return Ok(payload);
                }
                StatsOutcome::Unauthorized if retries_left > 0 => {
                    tracing::warn!(website_id, "token rejected by analytics backend, logging in again");
                    self.tokens.invalidate(&token).await;
                    retries_left -= 1;
                }
                StatsOutcome::Unauthorized => {
                    return Err(AnalyticsError::Upstream { status: 401 });
                }
                StatsOutcome::Status(status) => {
                    return Err(AnalyticsError::Upstream { status });
                }
            }
        }
    }

    async fn fetch_slot(&self, website_id: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight
            .entry(website_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
