//! List query cache.
//!
//! Results are cached per [`QueryKey`]. Concurrent fetches of the same key
//! share one in-flight request. Mutations invalidate a domain, which marks
//! its entries stale and bumps a generation counter so that requests started
//! before the invalidation cannot mark their results fresh.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use shared::models::{FilterSet, Page};
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::resource::Resource;

type SharedFetch<T> = Shared<LocalBoxFuture<'static, Result<Page<T>, ApiError>>>;

/// Pages kept per domain. Past this, stale entries go first, then the
/// oldest.
pub const MAX_ENTRIES: usize = 32;

/// Domain plus canonical filter encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    domain: &'static str,
    params: String,
}

impl QueryKey {
    pub fn new(domain: &'static str, params: impl Into<String>) -> Self {
        Self {
            domain,
            params: params.into(),
        }
    }

    pub fn for_filters<F: FilterSet>(domain: &'static str, filters: &F) -> Self {
        Self::new(domain, filters.cache_key())
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.domain, self.params)
    }
}

struct CacheEntry<T> {
    page: Page<T>,
    stale: bool,
    written: u64,
}

struct InFlight<T> {
    generation: u64,
    fetch: SharedFetch<T>,
}

/// Cached pages of one domain.
pub struct QueryCache<T> {
    entries: RefCell<HashMap<QueryKey, CacheEntry<T>>>,
    in_flight: RefCell<HashMap<QueryKey, InFlight<T>>>,
    generation: Cell<u64>,
    requests: Cell<u64>,
    writes: Cell<u64>,
}

impl<T> fmt::Debug for QueryCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.borrow().len())
            .field("in_flight", &self.in_flight.borrow().len())
            .field("generation", &self.generation.get())
            .field("requests", &self.requests.get())
            .finish()
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(HashMap::new()),
            generation: Cell::new(0),
            requests: Cell::new(0),
            writes: Cell::new(0),
        }
    }
}

impl<T: Clone + 'static> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached page for `key` unless it is missing or stale.
    pub fn fresh(&self, key: &QueryKey) -> Option<Page<T>> {
        self.entries
            .borrow()
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.page.clone())
    }

    /// Cached page for `key`, stale or not.
    pub fn peek(&self, key: &QueryKey) -> Option<Page<T>> {
        self.entries.borrow().get(key).map(|entry| entry.page.clone())
    }

    /// True when an entry exists but must be refetched.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .borrow()
            .get(key)
            .is_some_and(|entry| entry.stale)
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.in_flight.borrow().contains_key(key)
    }

    /// Number of network requests started through this cache.
    pub fn requests_started(&self) -> u64 {
        self.requests.get()
    }

    /// Bumped by every invalidation.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Returns the page for `key`.
    ///
    /// A fresh cached page is returned without calling `fetcher`. Otherwise
    /// the caller joins the request already in flight for `key`, or starts
    /// one with `fetcher`.
    ///
    /// # Errors
    /// Returns the request's error. Failures are not cached.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Page<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>> + 'static,
    {
        if let Some(page) = self.fresh(key) {
            debug!(%key, "query cache hit");
            return Ok(page);
        }

        let (generation, fetch) = self.join_or_start(key, fetcher);
        let result = fetch.clone().await;
        self.settle(key, generation, &fetch, &result);
        result
    }

    fn join_or_start<F, Fut>(&self, key: &QueryKey, fetcher: F) -> (u64, SharedFetch<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>> + 'static,
    {
        let mut in_flight = self.in_flight.borrow_mut();
        if let Some(pending) = in_flight.get(key) {
            debug!(%key, "joining in-flight query");
            return (pending.generation, pending.fetch.clone());
        }

        debug!(%key, "starting query");
        self.requests.set(self.requests.get() + 1);
        let generation = self.generation.get();
        let fetch = fetcher().boxed_local().shared();
        in_flight.insert(
            key.clone(),
            InFlight {
                generation,
                fetch: fetch.clone(),
            },
        );
        (generation, fetch)
    }

    fn settle(
        &self,
        key: &QueryKey,
        generation: u64,
        fetch: &SharedFetch<T>,
        result: &Result<Page<T>, ApiError>,
    ) {
        {
            let mut in_flight = self.in_flight.borrow_mut();
            if in_flight
                .get(key)
                .is_some_and(|pending| pending.fetch.ptr_eq(fetch))
            {
                in_flight.remove(key);
            }
        }

        let Ok(page) = result else {
            return;
        };
        let stale = generation != self.generation.get();
        let mut entries = self.entries.borrow_mut();
        if stale && entries.get(key).is_some_and(|entry| !entry.stale) {
            return;
        }
        let written = self.writes.get() + 1;
        self.writes.set(written);
        entries.insert(
            key.clone(),
            CacheEntry {
                page: page.clone(),
                stale,
                written,
            },
        );
        while entries.len() > MAX_ENTRIES {
            let Some(evicted) = entries
                .iter()
                .filter(|(existing, _)| *existing != key)
                .min_by_key(|(_, entry)| (!entry.stale, entry.written))
                .map(|(existing, _)| existing.clone())
            else {
                break;
            };
            debug!(key = %evicted, "evicting cached page");
            entries.remove(&evicted);
        }
    }

    /// Number of cached pages, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Marks one key stale.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(key) {
            entry.stale = true;
        }
    }
}

impl<T> QueryCache<T> {
    /// Marks every key stale and detaches in-flight requests so the next
    /// fetch goes to the network.
    pub fn invalidate_all(&self) {
        self.generation.set(self.generation.get() + 1);
        for entry in self.entries.borrow_mut().values_mut() {
            entry.stale = true;
        }
        self.in_flight.borrow_mut().clear();
    }

    pub fn clear(&self) {
        self.generation.set(self.generation.get() + 1);
        self.entries.borrow_mut().clear();
        self.in_flight.borrow_mut().clear();
    }
}

trait ErasedCache {
    fn invalidate_all(&self);
    fn clear(&self);
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: 'static> ErasedCache for QueryCache<T> {
    fn invalidate_all(&self) {
        QueryCache::invalidate_all(self);
    }

    fn clear(&self) {
        QueryCache::clear(self);
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// One [`QueryCache`] per domain.
#[derive(Default)]
pub struct QueryClient {
    caches: RefCell<HashMap<&'static str, Rc<dyn ErasedCache>>>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut domains: Vec<&str> = self.caches.borrow().keys().copied().collect();
        domains.sort_unstable();
        f.debug_struct("QueryClient").field("domains", &domains).finish()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache of `R`'s domain, created on first use.
    pub fn cache<R: Resource>(&self) -> Rc<QueryCache<R::Entity>> {
        let mut caches = self.caches.borrow_mut();
        if let Some(existing) = caches.get(R::NAME) {
            match Rc::clone(existing).into_any().downcast::<QueryCache<R::Entity>>() {
                Ok(cache) => return cache,
                Err(_) => warn!(domain = R::NAME, "replacing cache registered with another entity type"),
            }
        }
        let cache = Rc::new(QueryCache::<R::Entity>::new());
        let erased: Rc<dyn ErasedCache> = cache.clone();
        caches.insert(R::NAME, erased);
        cache
    }

    /// Marks every list of `domain` stale.
    pub fn invalidate(&self, domain: &str) {
        let cache = self.caches.borrow().get(domain).cloned();
        if let Some(cache) = cache {
            debug!(domain, "invalidating queries");
            cache.invalidate_all();
        }
    }

    /// Drops every cached result, e.g. on logout.
    pub fn clear(&self) {
        let caches: Vec<_> = self.caches.borrow().values().cloned().collect();
        for cache in caches {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Companies, Jobs};
    use futures::channel::oneshot;
    use shared::models::{Job, JobFilterPatch, JobFilters};

    fn key(params: &str) -> QueryKey {
        QueryKey::new("jobs", params)
    }

    fn page(ids: &[u64]) -> Page<Job> {
        let items: Vec<Job> = ids
            .iter()
            .map(|id| Job {
                id: *id,
                ..Job::default()
            })
            .collect();
        let total = items.len() as u64;
        Page::new(items, total)
    }

    #[test]
    fn keys_use_canonical_filter_encoding() {
        let mut filters = JobFilters::default();
        filters.apply(JobFilterPatch {
            name: Some("a".into()),
            ..JobFilterPatch::default()
        });
        let key = QueryKey::for_filters("jobs", &filters);
        assert_eq!(key.to_string(), "jobs?name=a&no=1&limit=10");
        assert_eq!(key, QueryKey::for_filters("jobs", &filters.clone()));
    }

    #[tokio::test]
    async fn fresh_entries_skip_the_network() {
        let cache = QueryCache::new();
        let first = cache.fetch(&key("a"), || async { Ok(page(&[1])) }).await;
        assert_eq!(first, Ok(page(&[1])));

        let second = cache
            .fetch(&key("a"), || async { Ok(page(&[2])) })
            .await;
        assert_eq!(second, Ok(page(&[1])));
        assert_eq!(cache.requests_started(), 1);
    }

    #[tokio::test]
    async fn identical_concurrent_fetches_share_one_request() {
        let cache = QueryCache::new();
        let key_a = key("a");
        let (release, gate) = oneshot::channel::<()>();
        let gate = gate.shared();

        let first = cache.fetch(&key_a, {
            let gate = gate.clone();
            move || async move {
                let _ = gate.await;
                Ok(page(&[1, 2]))
            }
        });
        let second = cache.fetch(&key_a, || async { Ok(page(&[9])) });
        let releaser = async {
            tokio::task::yield_now().await;
            assert!(cache.is_in_flight(&key_a));
            let _ = release.send(());
        };

        let (first, second, ()) = futures::join!(first, second, releaser);
        assert_eq!(first, Ok(page(&[1, 2])));
        assert_eq!(second, Ok(page(&[1, 2])));
        assert_eq!(cache.requests_started(), 1);
        assert!(!cache.is_in_flight(&key_a));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache: QueryCache<Job> = QueryCache::new();
        let err = cache
            .fetch(&key("a"), || async { Err(ApiError::network("down")) })
            .await;
        assert!(err.is_err());
        assert_eq!(cache.peek(&key("a")), None);

        let ok = cache.fetch(&key("a"), || async { Ok(page(&[3])) }).await;
        assert_eq!(ok, Ok(page(&[3])));
        assert_eq!(cache.requests_started(), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_a_refetch() {
        let cache = QueryCache::new();
        cache.fetch(&key("a"), || async { Ok(page(&[1])) }).await.unwrap();
        cache.invalidate_all();
        assert!(cache.is_stale(&key("a")));
        assert_eq!(cache.fresh(&key("a")), None);
        assert_eq!(cache.peek(&key("a")), Some(page(&[1])));

        let refreshed = cache.fetch(&key("a"), || async { Ok(page(&[1, 4])) }).await;
        assert_eq!(refreshed, Ok(page(&[1, 4])));
        assert!(!cache.is_stale(&key("a")));
    }

    #[tokio::test]
    async fn results_started_before_invalidation_stay_stale() {
        let cache = QueryCache::new();
        let key_a = key("a");
        let (release, gate) = oneshot::channel::<()>();

        let pending = cache.fetch(&key_a, move || async move {
            let _ = gate.await;
            Ok(page(&[1]))
        });
        let invalidate = async {
            tokio::task::yield_now().await;
            cache.invalidate_all();
            let _ = release.send(());
        };
        let (result, ()) = futures::join!(pending, invalidate);

        assert_eq!(result, Ok(page(&[1])));
        assert!(cache.is_stale(&key_a));
    }

    #[tokio::test]
    async fn entries_are_capped_per_domain() {
        let cache = QueryCache::new();
        for n in 0..MAX_ENTRIES {
            let params = format!("no={n}");
            cache.fetch(&key(&params), || async { Ok(page(&[1])) }).await.unwrap();
        }
        assert_eq!(cache.len(), MAX_ENTRIES);
        cache.invalidate(&key("no=5"));

        cache.fetch(&key("extra"), || async { Ok(page(&[2])) }).await.unwrap();
        assert_eq!(cache.len(), MAX_ENTRIES);
        assert_eq!(cache.peek(&key("no=5")), None);
        assert!(cache.peek(&key("no=0")).is_some());

        cache.fetch(&key("more"), || async { Ok(page(&[3])) }).await.unwrap();
        assert_eq!(cache.len(), MAX_ENTRIES);
        assert_eq!(cache.peek(&key("no=0")), None);
        assert_eq!(cache.peek(&key("extra")), Some(page(&[2])));
    }

    #[test]
    fn client_keeps_one_cache_per_domain() {
        let client = QueryClient::new();
        let jobs = client.cache::<Jobs>();
        assert!(Rc::ptr_eq(&jobs, &client.cache::<Jobs>()));
        let _companies = client.cache::<Companies>();
        assert!(format!("{client:?}").contains("companies"));
    }

    #[tokio::test]
    async fn client_invalidates_by_domain_name() {
        let client = QueryClient::new();
        let jobs = client.cache::<Jobs>();
        jobs.fetch(&key("a"), || async { Ok(page(&[1])) }).await.unwrap();

        client.invalidate("companies");
        assert!(!jobs.is_stale(&key("a")));
        client.invalidate("jobs");
        assert!(jobs.is_stale(&key("a")));

        client.clear();
        assert_eq!(jobs.peek(&key("a")), None);
    }
}
