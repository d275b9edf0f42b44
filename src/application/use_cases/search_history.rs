// Recent queries and saved filters, persisted through the session
// cache across reloads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::query::QuerySpec;
use crate::infrastructure::session_cache::KvCache;

pub const RECENT_QUERIES_KEY: &str = "recent_search_queries";
pub const SAVED_FILTERS_KEY: &str = "saved_search_filters";

/// Recent queries kept, newest first.
const MAX_RECENT_QUERIES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentQuery {
    pub query: String,
    pub results: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub spec: QuerySpec,
}

pub struct SearchHistoryService {
    cache: Arc<dyn KvCache>,
}

impl SearchHistoryService {
    pub fn new(cache: Arc<dyn KvCache>) -> Self {
        Self { cache }
    }

    /// Record an executed query at the head of the recent list.
    pub fn record_query(&self, query: &str, results: usize) {
        if query.trim().is_empty() {
            return;
        }

        let mut recent = self.recent_queries();
        recent.truncate(MAX_RECENT_QUERIES - 1);
        recent.insert(
            0,
            RecentQuery {
                query: query.to_string(),
                results,
                timestamp: Utc::now(),
            },
        );

        self.write(RECENT_QUERIES_KEY, &recent);
    }

    pub fn recent_queries(&self) -> Vec<RecentQuery> {
        self.read(RECENT_QUERIES_KEY)
    }

    pub fn save_filter(&self, name: &str, spec: QuerySpec) -> SavedFilter {
        let filter = SavedFilter {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: format!("Custom filter with {} criteria", spec.criteria_count()),
            created: Utc::now(),
            spec,
        };

        let mut filters = self.saved_filters();
        filters.insert(0, filter.clone());
        self.write(SAVED_FILTERS_KEY, &filters);

        filter
    }

    pub fn saved_filters(&self) -> Vec<SavedFilter> {
        self.read(SAVED_FILTERS_KEY)
    }

    pub fn delete_filter(&self, id: &str) {
        let mut filters = self.saved_filters();
        filters.retain(|f| f.id != id);
        self.write(SAVED_FILTERS_KEY, &filters);
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Vec<T> {
        self.cache
            .get(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write<T: Serialize>(&self, key: &str, entries: &[T]) {
        match serde_json::to_string(entries) {
            Ok(encoded) => {
                if let Err(err) = self.cache.set(key, &encoded) {
                    warn!(key, error = %err, "Failed to persist search history");
                }
            }
            Err(err) => warn!(key, error = %err, "Failed to encode search history"),
        }
    }
}
