//! Cached access to bracket reference data.
//!
//! [`BracketRepository`] fronts a [`BracketStore`] with an in-memory cache
//! and a fallback table. The cache holds every year fetched so far under a
//! single expiry; once the TTL elapses, the next call re-fetches. A failed
//! or timed-out fetch does not surface to the caller: the repository logs a
//! warning and serves the bundled table for the most recent known year, so
//! a calculation always gets a schedule. Availability is preferred over
//! perfect accuracy here, and the warning is the signal that the data may
//! be stale.
//!
//! The fallback is never cached; a store that recovers is picked up on the
//! next call. Refreshes are idempotent, so two concurrent callers may both
//! re-fetch and both results are equivalent.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::models::TaxBracket;
use crate::store::defaults::{DEFAULT_TAX_YEAR, default_brackets};
use crate::store::source::BracketStore;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct BracketCache {
    by_year: HashMap<i32, Vec<TaxBracket>>,
    refreshed_at: Option<Instant>,
}

/// Caching, fallback-protected view over a [`BracketStore`].
///
/// Owns its cache state; create one per process and share it by reference.
pub struct BracketRepository {
    store: Box<dyn BracketStore>,
    cache: Mutex<BracketCache>,
    cache_ttl: Duration,
    fetch_timeout: Duration,
}

impl BracketRepository {
    pub fn new(store: Box<dyn BracketStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(BracketCache::default()),
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Overrides the cache expiry. A zero TTL disables caching entirely.
    pub fn with_cache_ttl(
        mut self,
        ttl: Duration,
    ) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Overrides how long a fetch may run before falling back.
    pub fn with_fetch_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// The active brackets for `tax_year`, ordered by ascending `min_income`.
    ///
    /// Served from cache when fresh; otherwise fetched from the store. On
    /// fetch failure, timeout, or an unknown year, logs a warning and
    /// returns the bundled table for [`DEFAULT_TAX_YEAR`].
    pub async fn get_brackets(&self, tax_year: i32) -> Vec<TaxBracket> {
        if let Some(hit) = self.cached(tax_year) {
            return hit;
        }

        let fetch = self.store.fetch_brackets(tax_year);
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(rows)) => {
                let mut brackets: Vec<TaxBracket> =
                    rows.into_iter().filter(|b| b.is_active).collect();
                brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
                if brackets.is_empty() {
                    warn!(tax_year, "store returned no active brackets, using bundled table");
                    return default_brackets();
                }
                self.cache_insert(tax_year, brackets.clone());
                brackets
            }
            Ok(Err(error)) => {
                warn!(
                    tax_year,
                    %error,
                    fallback_year = DEFAULT_TAX_YEAR,
                    "bracket fetch failed, using bundled table"
                );
                default_brackets()
            }
            Err(_) => {
                warn!(
                    tax_year,
                    timeout_secs = self.fetch_timeout.as_secs_f64(),
                    fallback_year = DEFAULT_TAX_YEAR,
                    "bracket fetch timed out, using bundled table"
                );
                default_brackets()
            }
        }
    }

    /// Drops every cached table; the next call re-fetches.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock().unwrap();
        cache.by_year.clear();
        cache.refreshed_at = None;
    }

    fn cached(&self, tax_year: i32) -> Option<Vec<TaxBracket>> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(refreshed_at) = cache.refreshed_at {
            if refreshed_at.elapsed() >= self.cache_ttl {
                cache.by_year.clear();
                cache.refreshed_at = None;
            }
        }
        cache.by_year.get(&tax_year).cloned()
    }

    fn cache_insert(
        &self,
        tax_year: i32,
        brackets: Vec<TaxBracket>,
    ) {
        let mut cache = self.cache.lock().unwrap();
        cache.by_year.insert(tax_year, brackets);
        cache.refreshed_at = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use crate::store::defaults::{DEFAULT_TAX_YEAR, default_brackets};
    use crate::store::source::{BracketStore, StoreError};

    use super::*;

    /// Store that serves the bundled table and counts fetches.
    struct CountingStore {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BracketStore for CountingStore {
        async fn fetch_brackets(&self, tax_year: i32) -> Result<Vec<TaxBracket>, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if tax_year == DEFAULT_TAX_YEAR {
                Ok(default_brackets())
            } else {
                Err(StoreError::NotFound(tax_year))
            }
        }

        async fn list_tax_years(&self) -> Result<Vec<i32>, StoreError> {
            Ok(vec![DEFAULT_TAX_YEAR])
        }
    }

    struct FailingStore {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BracketStore for FailingStore {
        async fn fetch_brackets(&self, _tax_year: i32) -> Result<Vec<TaxBracket>, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Connection("store offline".to_string()))
        }

        async fn list_tax_years(&self) -> Result<Vec<i32>, StoreError> {
            Err(StoreError::Connection("store offline".to_string()))
        }
    }

    /// Store whose fetch never completes.
    struct HangingStore;

    #[async_trait]
    impl BracketStore for HangingStore {
        async fn fetch_brackets(&self, _tax_year: i32) -> Result<Vec<TaxBracket>, StoreError> {
            std::future::pending().await
        }

        async fn list_tax_years(&self) -> Result<Vec<i32>, StoreError> {
            std::future::pending().await
        }
    }

    fn counting_repository() -> (BracketRepository, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let repo = BracketRepository::new(Box::new(CountingStore {
            fetches: fetches.clone(),
        }));
        (repo, fetches)
    }

    #[tokio::test]
    async fn serves_brackets_from_the_store() {
        let (repo, _) = counting_repository();

        let brackets = repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(brackets, default_brackets());
    }

    #[tokio::test]
    async fn second_call_hits_the_cache() {
        let (repo, fetches) = counting_repository();

        repo.get_brackets(DEFAULT_TAX_YEAR).await;
        repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_ttl_refetches_every_call() {
        let (repo, fetches) = counting_repository();
        let repo = repo.with_cache_ttl(Duration::ZERO);

        repo.get_brackets(DEFAULT_TAX_YEAR).await;
        repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_a_refetch() {
        let (repo, fetches) = counting_repository();

        repo.get_brackets(DEFAULT_TAX_YEAR).await;
        repo.clear_cache();
        repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_the_bundled_table() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let repo = BracketRepository::new(Box::new(FailingStore {
            fetches: fetches.clone(),
        }));

        let brackets = repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(brackets, default_brackets());
    }

    #[tokio::test]
    async fn fallback_is_not_cached() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let repo = BracketRepository::new(Box::new(FailingStore {
            fetches: fetches.clone(),
        }));

        repo.get_brackets(DEFAULT_TAX_YEAR).await;
        repo.get_brackets(DEFAULT_TAX_YEAR).await;

        // A recovered store must be observed on the next call.
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_year_falls_back_to_the_bundled_table() {
        let (repo, _) = counting_repository();

        let brackets = repo.get_brackets(1999).await;

        assert_eq!(brackets, default_brackets());
    }

    #[tokio::test]
    async fn hung_fetch_times_out_to_the_bundled_table() {
        let repo = BracketRepository::new(Box::new(HangingStore))
            .with_fetch_timeout(Duration::from_millis(20));

        let brackets = repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(brackets, default_brackets());
    }

    #[tokio::test]
    async fn inactive_rows_are_filtered_and_rows_sorted() {
        let mut rows = default_brackets();
        rows[2].is_active = false;
        rows.reverse();
        let store = crate::store::InMemoryBracketStore::from_brackets(rows);
        let repo = BracketRepository::new(Box::new(store));

        let brackets = repo.get_brackets(DEFAULT_TAX_YEAR).await;

        assert_eq!(brackets.len(), 5);
        for pair in brackets.windows(2) {
            assert!(pair[0].min_income < pair[1].min_income);
        }
    }
}
