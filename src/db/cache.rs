use std::{collections::HashMap, fmt::Display, sync::Arc};

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Poster(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Titles are matched exactly, so no case folding here
            CacheKey::Poster(title) => write!(f, "poster:{}", title),
        }
    }
}

/// Process-lifetime memo table
///
/// Entries are written once and never evicted. Values are stored as JSON so a
/// single cache can hold any serializable result.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` when the key has not been stored yet.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let entries = self.entries.read().await;

        match entries.get(&key.to_string()) {
            Some(value) => {
                let data = serde_json::from_value(value.clone()).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value, replacing any previous entry for the key
    pub async fn set<T: serde::Serialize>(&self, key: &CacheKey, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        self.entries.write().await.insert(key.to_string(), value);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_poster() {
        let key = CacheKey::Poster("Inception".to_string());
        assert_eq!(format!("{}", key), "poster:Inception");
    }

    #[test]
    fn test_cache_key_display_keeps_case() {
        let key = CacheKey::Poster("THE MATRIX".to_string());
        assert_eq!(format!("{}", key), "poster:THE MATRIX");
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = Cache::new();
        let key = CacheKey::Poster("nonexistent".to_string());
        let retrieved: Option<String> = cache.get_from_cache(&key).await.unwrap();

        assert_eq!(retrieved, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = Cache::new();
        let key = CacheKey::Poster("Tenet".to_string());

        cache.set(&key, &"https://img/tenet.jpg".to_string()).await;

        let retrieved: Option<String> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved.as_deref(), Some("https://img/tenet.jpg"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = Cache::new();
        let other = cache.clone();
        let key = CacheKey::Poster("Dunkirk".to_string());

        other.set(&key, &"url".to_string()).await;

        let retrieved: Option<String> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved.as_deref(), Some("url"));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let cache = Cache::new();
        let key = CacheKey::Poster("Memento".to_string());
        cache.set(&key, &vec![1, 2, 3]).await;

        let retrieved: AppResult<Option<String>> = cache.get_from_cache(&key).await;
        assert!(retrieved.is_err());
    }
}
