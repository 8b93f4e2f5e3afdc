//! Single-flight cache with a scheduled refresh trigger
//!
//! [`SingleFlightCache`] owns one current value produced by an async fetch
//! function. At most one fetch runs at a time: callers that ask for a
//! refresh while one is in flight join it and receive the same result. A
//! successful fetch replaces the value as a whole; a failed fetch keeps the
//! previous value and records the error as a staleness signal.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::scheduler::PollingHandle;

type FetchFn<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;
type Cycle<T, E> = Shared<BoxFuture<'static, Result<Arc<T>, E>>>;

/// How far the held value can be trusted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness<E> {
    /// No refresh cycle has completed yet
    Pending,
    /// The last cycle succeeded
    Fresh,
    /// The last cycle failed with this error
    Stale(E),
}

impl<E> Freshness<E> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale(_))
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Freshness::Stale(error) => Some(error),
            _ => None,
        }
    }
}

/// Value and freshness as seen by observers after a cycle
#[derive(Debug)]
pub struct CacheState<T, E> {
    pub value: Option<Arc<T>>,
    pub freshness: Freshness<E>,
}

impl<T, E: Clone> Clone for CacheState<T, E> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            freshness: self.freshness.clone(),
        }
    }
}

impl<T, E> CacheState<T, E> {
    fn empty() -> Self {
        Self {
            value: None,
            freshness: Freshness::Pending,
        }
    }
}

/// Refresh counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches actually started (joined refreshes are not counted)
    pub cycles_started: u64,
    pub successes: u64,
    pub failures: u64,
}

struct Inner<T, E> {
    name: String,
    fetch: FetchFn<T, E>,
    state: RwLock<CacheState<T, E>>,
    in_flight: Mutex<Option<Cycle<T, E>>>,
    notifier: watch::Sender<CacheState<T, E>>,
    cycles_started: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

/// Shared, single-flight cache of one asynchronously fetched value
///
/// Cloning is cheap and every clone refers to the same cache.
///
/// # Example
///
/// ```rust
/// use kef_coordinator::SingleFlightCache;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = SingleFlightCache::new("answer", || async { Ok::<_, String>(42) });
/// assert!(cache.current().is_none());
///
/// let value = cache.refresh().await.unwrap();
/// assert_eq!(*value, 42);
/// assert_eq!(cache.current().as_deref(), Some(&42));
/// # }
/// ```
pub struct SingleFlightCache<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for SingleFlightCache<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> SingleFlightCache<T, E>
where
    T: Send + Sync + 'static,
    E: Clone + Display + Send + Sync + 'static,
{
    /// Create an empty cache around a fetch function
    pub fn new<F, Fut>(name: impl Into<String>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let fetch: FetchFn<T, E> = Arc::new(move || fetch().boxed());
        let (notifier, _) = watch::channel(CacheState::empty());

        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                fetch,
                state: RwLock::new(CacheState::empty()),
                in_flight: Mutex::new(None),
                notifier,
                cycles_started: AtomicU64::new(0),
                successes: AtomicU64::new(0),
                failures: AtomicU64::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Latest successfully fetched value, without waiting
    pub fn current(&self) -> Option<Arc<T>> {
        self.inner.state.read().value.clone()
    }

    pub fn freshness(&self) -> Freshness<E> {
        self.inner.state.read().freshness.clone()
    }

    /// Value and freshness read under one lock
    pub fn state(&self) -> CacheState<T, E> {
        self.inner.state.read().clone()
    }

    /// Run one fetch cycle, or join the one already in flight
    ///
    /// The cycle runs to completion on a spawned task, so cancelling this
    /// call does not cancel the fetch. Must be called from within a tokio
    /// runtime.
    pub async fn refresh(&self) -> Result<Arc<T>, E> {
        let cycle = {
            let mut slot = self.inner.in_flight.lock();
            match slot.as_ref() {
                Some(cycle) => {
                    trace!(name = %self.inner.name, "Joining in-flight refresh");
                    cycle.clone()
                }
                None => {
                    let cycle = Self::start_cycle(&self.inner);
                    *slot = Some(cycle.clone());
                    cycle
                }
            }
        };

        cycle.await
    }

    /// Refresh on demand; failures only update the staleness signal
    pub async fn request_refresh(&self) {
        if let Err(error) = self.refresh().await {
            debug!(name = %self.inner.name, %error, "Requested refresh failed");
        }
    }

    /// Observe every completed cycle
    pub fn subscribe(&self) -> watch::Receiver<CacheState<T, E>> {
        self.inner.notifier.subscribe()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cycles_started: self.inner.cycles_started.load(Ordering::Relaxed),
            successes: self.inner.successes.load(Ordering::Relaxed),
            failures: self.inner.failures.load(Ordering::Relaxed),
        }
    }

    /// Whether a fetch is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.inner.in_flight.lock().is_some()
    }

    /// Refresh every `interval` on a background task
    ///
    /// The first scheduled refresh happens one interval from now. Must be
    /// called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn start_polling(&self, interval: Duration) -> PollingHandle {
        let cache = self.clone();
        PollingHandle::spawn(self.inner.name.clone(), interval, move || {
            let cache = cache.clone();
            async move { cache.request_refresh().await }
        })
    }

    fn start_cycle(inner: &Arc<Inner<T, E>>) -> Cycle<T, E> {
        inner.cycles_started.fetch_add(1, Ordering::Relaxed);
        trace!(name = %inner.name, "Starting refresh cycle");

        // The slot holds this future, so it only keeps a weak handle back.
        let weak: Weak<Inner<T, E>> = Arc::downgrade(inner);
        let fetch = Arc::clone(&inner.fetch);

        // The cycle runs on its own task so it completes and clears the slot
        // even when every caller stops awaiting it.
        let task = tokio::spawn({
            let weak = weak.clone();
            async move {
                let result = fetch().await;
                match weak.upgrade() {
                    Some(inner) => inner.complete(result),
                    None => result.map(Arc::new),
                }
            }
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(error) => {
                    if let Some(inner) = weak.upgrade() {
                        *inner.in_flight.lock() = None;
                    }
                    if error.is_panic() {
                        std::panic::resume_unwind(error.into_panic());
                    }
                    // Only cancelled at runtime shutdown, which drops this awaiter too.
                    futures::future::pending().await
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl<T, E: Clone + Display> Inner<T, E> {
    fn complete(&self, result: Result<T, E>) -> Result<Arc<T>, E> {
        let outcome = {
            let mut state = self.state.write();
            match result {
                Ok(value) => {
                    let value = Arc::new(value);
                    if state.freshness.is_stale() {
                        info!(name = %self.name, "Fetching data recovered");
                    }
                    state.value = Some(Arc::clone(&value));
                    state.freshness = Freshness::Fresh;
                    self.successes.fetch_add(1, Ordering::Relaxed);
                    Ok(value)
                }
                Err(error) => {
                    if state.freshness.is_stale() {
                        debug!(name = %self.name, %error, "Fetching data still failing");
                    } else {
                        warn!(name = %self.name, %error, "Error fetching data");
                    }
                    state.freshness = Freshness::Stale(error.clone());
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    Err(error)
                }
            }
        };

        *self.in_flight.lock() = None;

        let published = self.state.read().clone();
        self.notifier.send_replace(published);

        outcome
    }
}
