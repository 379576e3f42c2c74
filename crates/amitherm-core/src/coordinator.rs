// ── Polling coordinator ──
//
// Owns the cached "last known good" snapshot for one polled data group,
// refreshes it on a timer or on demand, and fans completed refreshes
// out to registered listeners. At most one fetch is ever in flight per
// coordinator; concurrent refresh requests coalesce onto the pending
// fetch and all observe its outcome.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

/// One fetch operation for a polled data group.
///
/// The coordinator treats the payload as opaque: it caches whatever
/// `fetch` returns and never looks inside.
pub trait UpdateSource: Send + Sync + 'static {
    type Data: Send + Sync + 'static;

    fn fetch(&self) -> impl Future<Output = Result<Self::Data, CoreError>> + Send;
}

/// Outcome of a single refresh, shared by every coalesced waiter.
pub type RefreshOutcome<T> = Result<Arc<T>, CoreError>;

/// The coordinator's view of its cache at one point in time.
///
/// `data` survives failed refreshes (fail-soft): after a failure it
/// still holds the previous good result while `available` is `false`.
pub struct Snapshot<T> {
    pub data: Option<Arc<T>>,
    pub last_updated: Option<DateTime<Utc>>,
    /// `true` iff data exists and the most recent refresh succeeded.
    pub available: bool,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            last_updated: self.last_updated,
            available: self.available,
        }
    }
}

impl<T> Snapshot<T> {
    /// The cached payload, or [`CoreError::NotYetFetched`] before the
    /// first successful refresh.
    pub fn require(&self) -> Result<&Arc<T>, CoreError> {
        self.data.as_ref().ok_or(CoreError::NotYetFetched)
    }
}

/// Handle returned by [`Coordinator::register`]; pass it back to
/// [`Coordinator::unregister`] to remove the listener.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: u64,
}

type Listener<T> = Arc<dyn Fn(&Snapshot<T>) + Send + Sync>;

/// Polling coordinator for one data group.
///
/// Cheaply cloneable via `Arc`. The periodic refresh task runs only
/// while at least one listener is registered: the first registration
/// starts it, removal of the last one cancels it.
pub struct Coordinator<S: UpdateSource> {
    inner: Arc<CoordinatorInner<S>>,
}

impl<S: UpdateSource> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<S: UpdateSource> {
    name: &'static str,
    source: S,
    interval: Duration,
    state: RwLock<CacheState<S::Data>>,
    /// `Some` while a fetch is executing; waiters subscribe to the
    /// sender and receive that fetch's outcome instead of starting
    /// their own.
    in_flight: AsyncMutex<Option<broadcast::Sender<RefreshOutcome<S::Data>>>>,
    /// Unordered -- listeners are independent, so fan-out order carries
    /// no meaning.
    listeners: Mutex<HashMap<u64, Listener<S::Data>>>,
    next_subscription: AtomicU64,
    ticker: Mutex<Option<CancellationToken>>,
}

struct CacheState<T> {
    data: Option<Arc<T>>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<CoreError>,
}

impl<S: UpdateSource> Coordinator<S> {
    /// Create a coordinator. No fetch happens until
    /// [`first_refresh`](Self::first_refresh) or the first periodic tick.
    pub fn new(name: &'static str, source: S, interval: Duration) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                name,
                source,
                interval,
                state: RwLock::new(CacheState {
                    data: None,
                    last_updated: None,
                    last_error: None,
                }),
                in_flight: AsyncMutex::new(None),
                listeners: Mutex::new(HashMap::new()),
                next_subscription: AtomicU64::new(0),
                ticker: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn update_interval(&self) -> Duration {
        self.inner.interval
    }

    // ── Cache observation ────────────────────────────────────────────

    /// The current cache state (cheap `Arc` clones).
    pub fn snapshot(&self) -> Snapshot<S::Data> {
        let state = self.inner.state.read().expect("state lock poisoned");
        Snapshot {
            data: state.data.clone(),
            last_updated: state.last_updated,
            available: state.data.is_some() && state.last_error.is_none(),
        }
    }

    /// The most recent refresh failure, if the last refresh failed.
    pub fn last_error(&self) -> Option<CoreError> {
        self.inner
            .state
            .read()
            .expect("state lock poisoned")
            .last_error
            .clone()
    }

    // ── Listener registry ────────────────────────────────────────────

    /// Register a listener invoked after every completed refresh,
    /// success or failure. Starting with the first listener, the
    /// periodic refresh task runs every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register(
        &self,
        listener: impl Fn(&Snapshot<S::Data>) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        let was_empty = {
            let mut listeners = self.inner.listeners.lock().expect("listener lock poisoned");
            let was_empty = listeners.is_empty();
            listeners.insert(id, Arc::new(listener));
            was_empty
        };
        if was_empty {
            self.start_ticker();
        }
        SubscriptionHandle { id }
    }

    /// Remove a listener. Unregistering an already-removed handle is a
    /// no-op. When the last listener goes, the periodic task stops.
    pub fn unregister(&self, handle: &SubscriptionHandle) {
        let now_empty = {
            let mut listeners = self.inner.listeners.lock().expect("listener lock poisoned");
            listeners.remove(&handle.id);
            listeners.is_empty()
        };
        if now_empty {
            if let Some(cancel) = self
                .inner
                .ticker
                .lock()
                .expect("ticker lock poisoned")
                .take()
            {
                cancel.cancel();
                debug!(coordinator = self.inner.name, "periodic refresh suspended");
            }
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch before any cache exists. Failures propagate loudly: with
    /// no stale data to fall back on, the caller (setup) must know.
    pub async fn first_refresh(&self) -> RefreshOutcome<S::Data> {
        let outcome = self.refresh().await;
        if outcome.is_ok() {
            debug!(coordinator = self.inner.name, "first refresh complete");
        }
        outcome
    }

    /// Request an out-of-cycle refresh (e.g. after a command).
    ///
    /// If a fetch is already in flight the request coalesces onto it
    /// and resolves with that fetch's outcome; otherwise a new fetch
    /// starts. Either way the caller waits only for the shared fetch.
    pub async fn request_refresh(&self) -> RefreshOutcome<S::Data> {
        self.refresh().await
    }

    async fn refresh(&self) -> RefreshOutcome<S::Data> {
        let tx = {
            let mut in_flight = self.inner.in_flight.lock().await;
            if let Some(tx) = in_flight.as_ref() {
                // Coalesce: wait for the fetch already executing.
                let mut rx = tx.subscribe();
                drop(in_flight);
                return match rx.recv().await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(CoreError::Internal("in-flight refresh was dropped".into())),
                };
            }
            let (tx, _rx) = broadcast::channel(1);
            *in_flight = Some(tx.clone());
            tx
        };

        let outcome = self.run_fetch().await;

        // Clear the in-flight marker before waking waiters, so a waiter
        // that immediately re-requests starts a fresh fetch instead of
        // attaching to this finished one.
        *self.inner.in_flight.lock().await = None;
        let _ = tx.send(outcome.clone());
        outcome
    }

    /// Execute one fetch, apply the outcome to the cache, and notify
    /// every listener exactly once.
    async fn run_fetch(&self) -> RefreshOutcome<S::Data> {
        debug!(coordinator = self.inner.name, "refreshing");
        let outcome = match self.inner.source.fetch().await {
            Ok(data) => {
                let data = Arc::new(data);
                let mut state = self.inner.state.write().expect("state lock poisoned");
                state.data = Some(Arc::clone(&data));
                state.last_updated = Some(Utc::now());
                state.last_error = None;
                drop(state);
                Ok(data)
            }
            Err(err) => {
                warn!(
                    coordinator = self.inner.name,
                    error = %err,
                    "refresh failed; keeping cached data"
                );
                let mut state = self.inner.state.write().expect("state lock poisoned");
                state.last_error = Some(err.clone());
                drop(state);
                Err(err)
            }
        };
        self.notify_listeners();
        outcome
    }

    /// Invoke every registered listener with the post-refresh snapshot.
    /// Runs without holding the registry lock so listeners may
    /// register/unregister from inside the callback.
    fn notify_listeners(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener<S::Data>> = self
            .inner
            .listeners
            .lock()
            .expect("listener lock poisoned")
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    // ── Periodic task ────────────────────────────────────────────────

    fn start_ticker(&self) {
        let cancel = CancellationToken::new();
        {
            let mut ticker = self.inner.ticker.lock().expect("ticker lock poisoned");
            if ticker.is_some() {
                return;
            }
            *ticker = Some(cancel.clone());
        }
        debug!(
            coordinator = self.inner.name,
            interval_secs = self.inner.interval.as_secs(),
            "periodic refresh started"
        );
        tokio::spawn(tick_task(self.clone(), cancel));
    }
}

/// Periodically refresh until cancelled. Tick failures are recorded on
/// the coordinator and never escape this loop.
async fn tick_task<S: UpdateSource>(coordinator: Coordinator<S>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(coordinator.inner.interval);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(
                        coordinator = coordinator.inner.name,
                        error = %e,
                        "periodic refresh failed"
                    );
                }
            }
        }
    }
}
