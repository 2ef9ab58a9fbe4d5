// src/upstream/cache.rs

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::common::error::AppError;

/// Chave da coleção de leads no cache.
pub const LEADS_KEY: &str = "leads-management";
/// Alias legado da mesma coleção; invalidado junto.
pub const LEADS_LEGACY_KEY: &str = "leads";
pub const ORGANIZATION_KEY: &str = "organization";
pub const DASHBOARD_USERS_KEY: &str = "dashboard-users";

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
}

/// Cache chaveado de estado do servidor, com janela de frescor configurável.
/// Leitura dentro da janela vem do cache; leitura velha re-busca pelo
/// closure. Invalidação remove a entrada, então a próxima leitura volta ao
/// upstream (idempotente por construção).
pub struct QueryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stale_after: Duration,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stale_after,
        }
    }

    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.fetched_at.elapsed() < self.stale_after {
                    return Ok(serde_json::from_value(entry.value.clone())?);
                }
            }
        }

        let fresh = fetch().await?;
        self.put(key, &fresh).await?;
        Ok(fresh)
    }

    /// Grava diretamente (usado pelo worker de atualização periódica).
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
        Ok(())
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub async fn invalidate_many(&self, keys: &[&str]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetch(
        counter: Arc<AtomicUsize>,
    ) -> impl FnOnce() -> std::future::Ready<Result<Vec<u32>, AppError>> {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(vec![1, 2, 3]))
        }
    }

    #[tokio::test]
    async fn fresh_read_hits_cache() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let first: Vec<u32> = cache
            .get_or_fetch("k", counting_fetch(calls.clone()))
            .await
            .unwrap();
        let second: Vec<u32> = cache
            .get_or_fetch("k", counting_fetch(calls.clone()))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let _: Vec<u32> = cache
            .get_or_fetch("k", counting_fetch(calls.clone()))
            .await
            .unwrap();
        cache.invalidate("k").await;
        // Invalidar duas vezes não muda nada.
        cache.invalidate("k").await;
        let _: Vec<u32> = cache
            .get_or_fetch("k", counting_fetch(calls.clone()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stale_entry_refetches() {
        let cache = QueryCache::new(Duration::from_millis(0));
        let calls = Arc::new(AtomicUsize::new(0));

        let _: Vec<u32> = cache
            .get_or_fetch("k", counting_fetch(calls.clone()))
            .await
            .unwrap();
        let _: Vec<u32> = cache
            .get_or_fetch("k", counting_fetch(calls.clone()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
