use std::collections::HashMap;
use std::time::Duration;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use crate::config::CACHE_DURATION_SECS;
use crate::models::CacheEntry;

/// Last fetched stats per website id. Stale entries stay until overwritten.
pub struct VisitorCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for VisitorCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(CACHE_DURATION_SECS))
    }
}

impl VisitorCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, website_id: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(website_id)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.payload.clone())
    }

    pub async fn insert(&self, website_id: &str, payload: Value) {
        let mut entries = self.entries.write().await;
        entries.insert(
            website_id.to_string(),
            CacheEntry {
                payload,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
