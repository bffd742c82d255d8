//! Time-boxed memoization cache with single-flight fetches
//!
//! `get_or_fetch` returns a stored value while it is fresh. On a miss the
//! loader's future is parked in the map so concurrent callers for the same
//! key await that one fetch instead of starting their own.

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, warn};

use dashboard_core::DashboardResult;

use crate::clock::Clock;

type SharedFetch<V> = Shared<BoxFuture<'static, DashboardResult<V>>>;

/// Stored value with its expiry
#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
    /// `None` when `stored_at + ttl` is past the last representable instant
    expires_at: Option<DateTime<Utc>>,
}

impl<V> CachedEntry<V> {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }
}

enum Slot<V: Clone> {
    Ready(CachedEntry<V>),
    /// Fetch in flight; every caller for the key awaits this future
    Pending(SharedFetch<V>),
}

/// In-memory TTL cache keyed by request arguments
pub struct TtlCache<K, V: Clone> {
    name: &'static str,
    entries: Mutex<HashMap<K, Slot<V>>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn with_clock(name: &'static str, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Return the cached value for `key`, or run `loader` and cache its result
    ///
    /// A successful result is kept for `ttl`, measured from the moment it is
    /// stored. Failures are never cached; they are returned to every caller
    /// that was waiting on the fetch and the next call starts a new one.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: K,
        ttl: Duration,
        loader: F,
    ) -> DashboardResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DashboardResult<V>> + Send + 'static,
    {
        let fetch = {
            let mut entries = self.entries.lock();
            let now = self.clock.now();

            let in_flight = match entries.get(&key) {
                Some(Slot::Ready(entry)) if entry.is_fresh(now) => {
                    debug!("[{}] cache hit for {:?}", self.name, key);
                    return Ok(entry.value.clone());
                }
                Some(Slot::Pending(fetch)) => Some(fetch.clone()),
                _ => None,
            };

            match in_flight {
                Some(fetch) => {
                    debug!("[{}] joining in-flight fetch for {:?}", self.name, key);
                    fetch
                }
                None => {
                    debug!("[{}] cache miss for {:?}", self.name, key);
                    let fetch = loader().boxed().shared();
                    entries.insert(key.clone(), Slot::Pending(fetch.clone()));
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        let mut entries = self.entries.lock();
        // Only the first caller to finish settles the slot
        let owns_slot = matches!(
            entries.get(&key),
            Some(Slot::Pending(pending)) if pending.ptr_eq(&fetch)
        );

        if owns_slot {
            match &result {
                Ok(value) => {
                    let stored_at = self.clock.now();
                    entries.insert(
                        key,
                        Slot::Ready(CachedEntry {
                            value: value.clone(),
                            stored_at,
                            expires_at: stored_at.checked_add_signed(ttl),
                        }),
                    );
                }
                Err(e) => {
                    warn!("[{}] fetch for {:?} failed: {}", self.name, key, e);
                    entries.remove(&key);
                }
            }
        }

        result
    }

    /// Remove expired values
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, slot| match slot {
            Slot::Ready(entry) => entry.is_fresh(now),
            Slot::Pending(_) => true,
        });
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.lock();

        let mut stats = CacheStats {
            name: self.name,
            ..CacheStats::default()
        };

        for slot in entries.values() {
            match slot {
                Slot::Ready(entry) => {
                    if entry.is_fresh(now) {
                        stats.fresh += 1;
                    } else {
                        stats.stale += 1;
                    }
                    stats.oldest_entry = Some(match stats.oldest_entry {
                        Some(oldest) if oldest <= entry.stored_at => oldest,
                        _ => entry.stored_at,
                    });
                }
                Slot::Pending(_) => stats.in_flight += 1,
            }
        }

        stats
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CacheStats {
    pub name: &'static str,
    pub fresh: usize,
    pub stale: usize,
    pub in_flight: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use dashboard_core::DashboardError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn test_cache() -> (TtlCache<String, u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        (TtlCache::with_clock("test", clock.clone()), clock)
    }

    fn counting_loader(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> BoxFuture<'static, DashboardResult<u32>> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let (cache, _clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let ttl = Duration::minutes(5);

        let first = cache
            .get_or_fetch("BTC".to_string(), ttl, counting_loader(&calls, 1))
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("BTC".to_string(), ttl, counting_loader(&calls, 2))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (cache, clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let ttl = Duration::minutes(5);

        cache
            .get_or_fetch("ETH".to_string(), ttl, counting_loader(&calls, 1))
            .await
            .unwrap();

        clock.advance(Duration::seconds(299));
        let still_cached = cache
            .get_or_fetch("ETH".to_string(), ttl, counting_loader(&calls, 2))
            .await
            .unwrap();
        assert_eq!(still_cached, 1);

        clock.advance(Duration::seconds(1));
        let refreshed = cache
            .get_or_fetch("ETH".to_string(), ttl, counting_loader(&calls, 2))
            .await
            .unwrap();
        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (cache, _clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let ttl = Duration::minutes(60);

        let a = cache
            .get_or_fetch("a".to_string(), ttl, counting_loader(&calls, 1))
            .await
            .unwrap();
        let b = cache
            .get_or_fetch("b".to_string(), ttl, counting_loader(&calls, 2))
            .await
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(cache.stats().fresh, 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let (cache, _clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());
        let ttl = Duration::minutes(5);

        let slow_loader = {
            let calls = Arc::clone(&calls);
            let release = Arc::clone(&release);
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                release.notified().await;
                Ok(42)
            }
        };

        let (first, second, _) = tokio::join!(
            cache.get_or_fetch("XRP".to_string(), ttl, slow_loader),
            cache.get_or_fetch("XRP".to_string(), ttl, counting_loader(&calls, 7)),
            async {
                tokio::task::yield_now().await;
                release.notify_one();
            }
        );

        assert_eq!(first.unwrap(), 42);
        assert_eq!(second.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().in_flight, 0);
    }

    #[tokio::test]
    async fn test_failures_reach_all_waiters_and_are_not_cached() {
        let (cache, _clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());
        let ttl = Duration::minutes(5);

        let failing_loader = {
            let calls = Arc::clone(&calls);
            let release = Arc::clone(&release);
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                release.notified().await;
                Err(DashboardError::upstream("test", "boom"))
            }
        };

        let (first, second, _) = tokio::join!(
            cache.get_or_fetch("ADA".to_string(), ttl, failing_loader),
            cache.get_or_fetch("ADA".to_string(), ttl, counting_loader(&calls, 1)),
            async {
                tokio::task::yield_now().await;
                release.notify_one();
            }
        );

        assert_eq!(first, Err(DashboardError::upstream("test", "boom")));
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let retried = cache
            .get_or_fetch("ADA".to_string(), ttl, counting_loader(&calls, 5))
            .await
            .unwrap();
        assert_eq!(retried, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired() {
        let (cache, clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("a".to_string(), Duration::minutes(1), counting_loader(&calls, 1))
            .await
            .unwrap();
        cache
            .get_or_fetch("b".to_string(), Duration::minutes(10), counting_loader(&calls, 2))
            .await
            .unwrap();
        assert_eq!(cache.stats().fresh, 2);

        clock.advance(Duration::minutes(2));
        assert_eq!(cache.stats().stale, 1);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.stats().fresh, 1);
        assert_eq!(cache.stats().stale, 0);
    }

    #[tokio::test]
    async fn test_ttl_past_end_of_time_never_expires() {
        let (cache, clock) = test_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        // Lands beyond the largest year chrono can represent
        let ttl = Duration::days(365 * 300_000);

        let first = cache
            .get_or_fetch("SOL".to_string(), ttl, counting_loader(&calls, 1))
            .await
            .unwrap();

        clock.advance(Duration::days(10_000));
        let second = cache
            .get_or_fetch("SOL".to_string(), ttl, counting_loader(&calls, 2))
            .await
            .unwrap();

        assert_eq!((first, second), (1, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.purge_expired(), 0);
    }
}
