//! Freshness policy and recompute-on-miss orchestration.
//!
//! [`ResponseCache`] is what request handlers talk to. It reads the store,
//! decides whether an entry is usable, and otherwise runs the caller's
//! compute function and writes the result back.
//!
//! Concurrent misses for one key each run their compute function unless
//! single-flight mode is enabled; the last write wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::connection::CacheDb;
use super::flight::KeyedLocks;
use super::responses::{CachedResponse, ResponseParts};
use crate::config::AppConfig;
use crate::error::{BoxError, Error};

/// Two thresholds for stale-while-revalidate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// Entries younger than this are served without refreshing.
    pub fresh_for: Duration,
    /// Entries older than this are treated as absent.
    pub valid_for: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self { fresh_for: Duration::from_secs(3 * 60), valid_for: Duration::from_secs(5 * 60) }
    }
}

/// Outcome of reading a key against a [`FreshnessPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit(CachedResponse),
    /// Usable, but a refresh should be started.
    Stale(CachedResponse),
    Miss,
}

impl Lookup {
    pub fn into_record(self) -> Option<CachedResponse> {
        match self {
            Lookup::Hit(r) | Lookup::Stale(r) => Some(r),
            Lookup::Miss => None,
        }
    }
}

/// `age <= max_age`. A record stamped in the future counts as fresh.
fn within(age: chrono::Duration, max_age: Duration) -> bool {
    match age.to_std() {
        Ok(age) => age <= max_age,
        Err(_) => true,
    }
}

/// Policy layer over [`CacheDb`].
#[derive(Debug, Clone)]
pub struct ResponseCache {
    db: CacheDb,
    clock: Arc<dyn Clock>,
    compute_timeout: Option<Duration>,
    flights: Option<KeyedLocks>,
}

impl ResponseCache {
    pub fn new(db: CacheDb) -> Self {
        Self { db, clock: Arc::new(SystemClock), compute_timeout: None, flights: None }
    }

    /// Build from loaded configuration.
    pub fn from_config(db: CacheDb, config: &AppConfig) -> Self {
        let cache = Self::new(db).with_single_flight(config.single_flight);
        match config.compute_timeout() {
            Some(timeout) => cache.with_compute_timeout(timeout),
            None => cache,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Default limit applied to every compute function.
    pub fn with_compute_timeout(mut self, timeout: Duration) -> Self {
        self.compute_timeout = Some(timeout);
        self
    }

    /// Coalesce concurrent recomputes of the same key within this process.
    ///
    /// Callers that wait on another caller's recompute re-read the store and
    /// return that result instead of computing again.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.flights = enabled.then(KeyedLocks::default);
        self
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    /// Point lookup with no freshness check.
    pub async fn get(&self, key: &str) -> Result<Option<CachedResponse>, Error> {
        self.db.get_response(key).await
    }

    /// Return the entry for `key` if it is at most `max_age` old, otherwise
    /// run `compute`, store its result and return it.
    ///
    /// A `max_age` of zero always recomputes.
    ///
    /// # Errors
    ///
    /// - `Error::Compute` / `Error::ComputeTimeout` if `compute` fails or
    ///   exceeds the configured timeout. Nothing is written and any existing
    ///   entry is left in place.
    /// - `Error::InvalidInput` if `compute` returns a status outside 100..=599.
    /// - `Error::Database` if the store cannot be read or written.
    pub async fn fetch_or_compute<F, Fut, E>(
        &self, key: &str, max_age: Duration, compute: F,
    ) -> Result<CachedResponse, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResponseParts, E>>,
        E: Into<BoxError>,
    {
        self.fetch_or_compute_within(key, max_age, self.compute_timeout, compute)
            .await
    }

    /// [`Self::fetch_or_compute`] with a per-call compute timeout. `None`
    /// disables the limit for this call.
    pub async fn fetch_or_compute_within<F, Fut, E>(
        &self, key: &str, max_age: Duration, timeout: Option<Duration>, compute: F,
    ) -> Result<CachedResponse, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResponseParts, E>>,
        E: Into<BoxError>,
    {
        if let Some(hit) = self.fresh(key, max_age).await? {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }

        let _guard = match &self.flights {
            Some(flights) => {
                let guard = flights.lock(key).await;
                if let Some(hit) = self.fresh(key, max_age).await? {
                    tracing::debug!(key, "cache hit after waiting on recompute");
                    return Ok(hit);
                }
                Some(guard)
            }
            None => None,
        };

        tracing::debug!(key, "cache miss");
        self.recompute(key, timeout, compute).await
    }

    /// Classify the entry for `key` against `policy`.
    pub async fn lookup(&self, key: &str, policy: &FreshnessPolicy) -> Result<Lookup, Error> {
        let Some(record) = self.db.get_response(key).await? else {
            return Ok(Lookup::Miss);
        };

        let age = record.age(self.clock.now());
        if within(age, policy.fresh_for) {
            Ok(Lookup::Hit(record))
        } else if within(age, policy.valid_for) {
            Ok(Lookup::Stale(record))
        } else {
            Ok(Lookup::Miss)
        }
    }

    /// Stale-while-revalidate read.
    ///
    /// A fresh entry is returned as is. A stale but valid entry is returned
    /// immediately while `compute` refreshes it on a background task; errors
    /// from that refresh are logged and dropped. Otherwise `compute` runs
    /// inline as in [`Self::fetch_or_compute`].
    pub async fn fetch_revalidating<F, Fut, E>(
        &self, key: &str, policy: FreshnessPolicy, compute: F,
    ) -> Result<CachedResponse, Error>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<ResponseParts, E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        match self.lookup(key, &policy).await? {
            Lookup::Hit(record) => {
                tracing::debug!(key, "cache hit");
                Ok(record)
            }
            Lookup::Stale(record) => {
                tracing::debug!(key, "serving stale entry, refreshing in background");
                let cache = self.clone();
                let key = key.to_string();
                tokio::spawn(async move {
                    if let Err(e) = cache.refresh_stale(&key, policy, compute).await {
                        tracing::warn!(key = %key, error = %e, "background refresh failed");
                    }
                });
                Ok(record)
            }
            Lookup::Miss => self.fetch_or_compute(key, policy.valid_for, compute).await,
        }
    }

    async fn refresh_stale<F, Fut, E>(&self, key: &str, policy: FreshnessPolicy, compute: F) -> Result<(), Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResponseParts, E>>,
        E: Into<BoxError>,
    {
        let _guard = match &self.flights {
            Some(flights) => {
                let guard = flights.lock(key).await;
                if matches!(self.lookup(key, &policy).await?, Lookup::Hit(_)) {
                    return Ok(());
                }
                Some(guard)
            }
            None => None,
        };

        self.recompute(key, self.compute_timeout, compute).await?;
        Ok(())
    }

    /// Remove the entry for `key`. Returns whether one existed.
    pub async fn invalidate(&self, key: &str) -> Result<bool, Error> {
        let removed = self.db.delete_response(key).await?;
        tracing::debug!(key, removed, "invalidated");
        Ok(removed)
    }

    /// Remove every entry whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, Error> {
        let removed = self.db.delete_responses_with_prefix(prefix).await?;
        tracing::debug!(prefix, removed, "invalidated prefix");
        Ok(removed)
    }

    /// Remove entries under `prefix` whose body mentions `needle`, e.g. every
    /// cached listing that contains a record that just changed.
    pub async fn invalidate_mentions(&self, prefix: &str, needle: &str) -> Result<u64, Error> {
        let removed = self.db.delete_responses_containing(prefix, needle).await?;
        tracing::debug!(prefix, needle, removed, "invalidated mentions");
        Ok(removed)
    }

    /// Delete entries that `policy` would no longer serve.
    pub async fn purge_expired(&self, policy: &FreshnessPolicy) -> Result<u64, Error> {
        self.purge_older_than(policy.valid_for).await
    }

    /// Delete entries inserted more than `age` ago. An age reaching past the
    /// representable date range matches nothing.
    pub async fn purge_older_than(&self, age: Duration) -> Result<u64, Error> {
        let cutoff = chrono::Duration::from_std(age)
            .ok()
            .and_then(|age| self.clock.now().checked_sub_signed(age));
        let Some(cutoff) = cutoff else {
            tracing::debug!(?age, "purge age exceeds date range, nothing to purge");
            return Ok(0);
        };
        let removed = self.db.purge_responses_before(cutoff).await?;
        tracing::info!(removed, "purged old entries");
        Ok(removed)
    }

    async fn fresh(&self, key: &str, max_age: Duration) -> Result<Option<CachedResponse>, Error> {
        if max_age.is_zero() {
            return Ok(None);
        }
        let Some(record) = self.db.get_response(key).await? else {
            return Ok(None);
        };
        Ok(within(record.age(self.clock.now()), max_age).then_some(record))
    }

    async fn recompute<F, Fut, E>(&self, key: &str, timeout: Option<Duration>, compute: F) -> Result<CachedResponse, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResponseParts, E>>,
        E: Into<BoxError>,
    {
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, compute())
                .await
                .map_err(|_| Error::ComputeTimeout(limit))?,
            None => compute().await,
        };
        let parts = result.map_err(Error::compute)?;
        parts.validate()?;

        let record = CachedResponse::new(key, parts, self.clock.now());
        self.db.put_response(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Compute = std::future::Ready<Result<ResponseParts, io::Error>>;

    fn counting(calls: &AtomicUsize, parts: ResponseParts) -> impl FnOnce() -> Compute + '_ {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(parts))
        }
    }

    fn failing(calls: &AtomicUsize) -> impl FnOnce() -> Compute + '_ {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err(io::Error::other("upstream returned 502")))
        }
    }

    async fn setup() -> (ResponseCache, ManualClock) {
        let clock = ManualClock::starting_now();
        let db = CacheDb::open_in_memory().await.unwrap();
        (ResponseCache::new(db).with_clock(clock.clone()), clock)
    }

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_cold_then_warm() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);

        let first = cache
            .fetch_or_compute("req:GET:/people", MINUTE, counting(&calls, ResponseParts::new(200, "[]")))
            .await
            .unwrap();
        let second = cache
            .fetch_or_compute("req:GET:/people", MINUTE, counting(&calls, ResponseParts::new(500, "nope")))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second.parts(), ResponseParts::new(200, "[]"));
    }

    #[tokio::test]
    async fn test_stale_after_max_age() {
        let (cache, clock) = setup().await;
        let calls = AtomicUsize::new(0);

        cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "v1")))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(60));
        let at_limit = cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "v2")))
            .await
            .unwrap();
        assert_eq!(at_limit.body, "v1");

        clock.advance(chrono::Duration::seconds(1));
        let refreshed = cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "v2")))
            .await
            .unwrap();
        assert_eq!(refreshed.body, "v2");
        assert_eq!(refreshed.inserted_at, clock.now());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get("k").await.unwrap().unwrap(), refreshed);
    }

    #[tokio::test]
    async fn test_zero_max_age_always_recomputes() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .fetch_or_compute("k", Duration::ZERO, counting(&calls, ResponseParts::new(200, "")))
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_compute_failure_writes_nothing() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);

        let err = cache.fetch_or_compute("k", MINUTE, failing(&calls)).await.unwrap_err();
        assert!(matches!(err, Error::Compute(_)));
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_compute_failure_keeps_stale_entry() {
        let (cache, clock) = setup().await;
        let calls = AtomicUsize::new(0);

        let original = cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "old")))
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(10));

        let err = cache.fetch_or_compute("k", MINUTE, failing(&calls)).await.unwrap_err();
        assert!(err.is_compute());
        assert_eq!(cache.get("k").await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_compute_timeout_writes_nothing() {
        let (cache, _clock) = setup().await;
        let cache = cache.with_compute_timeout(Duration::from_millis(20));

        let err = cache
            .fetch_or_compute("k", MINUTE, || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, io::Error>(ResponseParts::new(200, "late"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ComputeTimeout(_)));
        assert!(cache.get("k").await.unwrap().is_none());

        // A per-call override lifts the limit.
        let ok = cache
            .fetch_or_compute_within("k", MINUTE, None, || async {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok::<_, io::Error>(ResponseParts::new(200, "slow but fine"))
            })
            .await
            .unwrap();
        assert_eq!(ok.body, "slow but fine");
    }

    #[tokio::test]
    async fn test_invalid_status_is_not_stored() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);

        let err = cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(700, "")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);
        cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "")))
            .await
            .unwrap();

        assert!(cache.invalidate("k").await.unwrap());
        assert!(cache.get("k").await.unwrap().is_none());
        assert!(!cache.invalidate("k").await.unwrap());

        cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "")))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_compute() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);
        let barrier = tokio::sync::Barrier::new(2);

        let compute = |body: &'static str| {
            let calls = &calls;
            let barrier = &barrier;
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                // Both callers are past their cache read before either writes.
                barrier.wait().await;
                Ok::<_, io::Error>(ResponseParts::new(200, body))
            }
        };

        let (a, b) = tokio::join!(
            cache.fetch_or_compute("k", MINUTE, compute("a")),
            cache.fetch_or_compute("k", MINUTE, compute("b")),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_ne!(a.body, b.body);
        let stored = cache.get("k").await.unwrap().unwrap();
        assert!(stored == a || stored == b);
    }

    #[tokio::test]
    async fn test_single_flight_coalesces_misses() {
        let (cache, _clock) = setup().await;
        let cache = cache.with_single_flight(true);
        let calls = AtomicUsize::new(0);

        let compute = || {
            let calls = &calls;
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok::<_, io::Error>(ResponseParts::new(200, "once"))
            }
        };

        let (a, b, c) = tokio::join!(
            cache.fetch_or_compute("k", MINUTE, compute()),
            cache.fetch_or_compute("k", MINUTE, compute()),
            cache.fetch_or_compute("k", MINUTE, compute()),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
    }

    #[tokio::test]
    async fn test_single_flight_does_not_serialize_other_keys() {
        let (cache, _clock) = setup().await;
        let cache = cache.with_single_flight(true);
        let calls = AtomicUsize::new(0);

        let (a, b) = tokio::join!(
            cache.fetch_or_compute("a", MINUTE, counting(&calls, ResponseParts::new(200, "a"))),
            cache.fetch_or_compute("b", MINUTE, counting(&calls, ResponseParts::new(200, "b"))),
        );
        assert_eq!(a.unwrap().body, "a");
        assert_eq!(b.unwrap().body, "b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_classification() {
        let (cache, clock) = setup().await;
        let policy = FreshnessPolicy::default();
        let calls = AtomicUsize::new(0);

        assert_eq!(cache.lookup("k", &policy).await.unwrap(), Lookup::Miss);

        cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "")))
            .await
            .unwrap();
        assert!(matches!(cache.lookup("k", &policy).await.unwrap(), Lookup::Hit(_)));

        clock.advance(chrono::Duration::minutes(4));
        assert!(matches!(cache.lookup("k", &policy).await.unwrap(), Lookup::Stale(_)));

        let stale = cache.lookup("k", &policy).await.unwrap().into_record().unwrap();
        assert_eq!(stale.body, "");

        clock.advance(chrono::Duration::minutes(2));
        assert_eq!(cache.lookup("k", &policy).await.unwrap(), Lookup::Miss);
        assert_eq!(Lookup::Miss.into_record(), None);
        // Too old to serve, but still stored until purged.
        assert!(cache.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_revalidating_serves_stale_then_refreshes() {
        let (cache, clock) = setup().await;
        let policy = FreshnessPolicy::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let make = |body: &'static str| {
            let calls = Arc::clone(&calls);
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, io::Error>(ResponseParts::new(200, body))
            }
        };

        let miss = cache.fetch_revalidating("k", policy, make("v1")).await.unwrap();
        assert_eq!(miss.body, "v1");

        let hit = cache.fetch_revalidating("k", policy, make("unused")).await.unwrap();
        assert_eq!(hit.body, "v1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(chrono::Duration::minutes(4));
        let stale = cache.fetch_revalidating("k", policy, make("v2")).await.unwrap();
        assert_eq!(stale.body, "v1");

        let mut refreshed = None;
        for _ in 0..100 {
            let current = cache.get("k").await.unwrap().unwrap();
            if current.body == "v2" {
                refreshed = Some(current);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let refreshed = refreshed.expect("background refresh did not land");
        assert_eq!(refreshed.inserted_at, clock.now());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_revalidating_treats_expired_as_miss() {
        let (cache, clock) = setup().await;
        let policy = FreshnessPolicy::default();

        cache
            .fetch_revalidating("k", policy, || async { Ok::<_, io::Error>(ResponseParts::new(200, "v1")) })
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(6));

        let fetched = cache
            .fetch_revalidating("k", policy, || async { Ok::<_, io::Error>(ResponseParts::new(200, "v2")) })
            .await
            .unwrap();
        assert_eq!(fetched.body, "v2");
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (cache, clock) = setup().await;
        let policy = FreshnessPolicy::default();
        let calls = AtomicUsize::new(0);

        cache
            .fetch_or_compute("old", MINUTE, counting(&calls, ResponseParts::new(200, "")))
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(6));
        cache
            .fetch_or_compute("new", MINUTE, counting(&calls, ResponseParts::new(200, "")))
            .await
            .unwrap();

        assert_eq!(cache.purge_expired(&policy).await.unwrap(), 1);
        assert!(cache.get("old").await.unwrap().is_none());
        assert!(cache.get("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_older_than_out_of_range_age() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);
        cache
            .fetch_or_compute("k", MINUTE, counting(&calls, ResponseParts::new(200, "")))
            .await
            .unwrap();

        let removed = cache
            .purge_older_than(Duration::from_secs(10_000_000_000_000))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(cache.purge_older_than(Duration::MAX).await.unwrap(), 0);
        assert!(cache.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_prefix_and_mentions() {
        let (cache, _clock) = setup().await;
        let calls = AtomicUsize::new(0);
        for (key, body) in [("t,app,tbl1,", "recX"), ("t,app,tbl1,recX", "recX"), ("t,app,tbl2,", "recY")] {
            cache
                .fetch_or_compute(key, MINUTE, counting(&calls, ResponseParts::new(200, body)))
                .await
                .unwrap();
        }

        assert_eq!(cache.invalidate_mentions("t,app,", "recY").await.unwrap(), 1);
        assert_eq!(cache.invalidate_prefix("t,app,tbl1,").await.unwrap(), 2);
        assert_eq!(cache.db().response_stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_from_config() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let config = AppConfig { single_flight: true, compute_timeout_ms: 250, ..Default::default() };
        let cache = ResponseCache::from_config(db, &config);
        assert_eq!(cache.compute_timeout, Some(Duration::from_millis(250)));
        assert!(cache.flights.is_some());
    }
}
