#![allow(clippy::unwrap_used)]
// Coordinator behavior tests with scripted in-memory sources.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::yield_now;

use amitherm_core::coordinator::{Coordinator, UpdateSource};
use amitherm_core::error::CoreError;

// ── Test sources ────────────────────────────────────────────────────

/// Counts fetches and blocks each one on a semaphore permit.
struct GatedSource {
    calls: Arc<AtomicUsize>,
    gate: Arc<Semaphore>,
}

impl UpdateSource for GatedSource {
    type Data = usize;

    async fn fetch(&self) -> Result<usize, CoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let permit = self.gate.acquire().await;
        drop(permit);
        Ok(call)
    }
}

/// Plays back a scripted sequence of outcomes, then repeats the last.
struct ScriptedSource {
    script: std::sync::Mutex<VecDeque<Result<usize, CoreError>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(outcomes: impl IntoIterator<Item = Result<usize, CoreError>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            script: std::sync::Mutex::new(outcomes.into_iter().collect()),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

impl UpdateSource for ScriptedSource {
    type Data = usize;

    async fn fetch(&self) -> Result<usize, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

fn flaky_error() -> CoreError {
    CoreError::ConnectionFailed {
        url: "http://plc.local".into(),
        reason: "connection refused".into(),
    }
}

// ── Coalescing ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn concurrent_refreshes_coalesce_onto_one_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Semaphore::new(0));
    let coordinator = Coordinator::new(
        "gated",
        GatedSource {
            calls: Arc::clone(&calls),
            gate: Arc::clone(&gate),
        },
        Duration::from_secs(30),
    );

    let first = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.request_refresh().await }
    });
    // Let the first fetch start and park on the gate before piling on.
    while calls.load(Ordering::SeqCst) == 0 {
        yield_now().await;
    }

    let mut waiters = Vec::new();
    for _ in 0..4 {
        let coordinator = coordinator.clone();
        waiters.push(tokio::spawn(
            async move { coordinator.request_refresh().await },
        ));
    }
    for _ in 0..10 {
        yield_now().await;
    }

    gate.add_permits(1);
    let lead = first.await.unwrap().unwrap();
    for waiter in waiters {
        let outcome = waiter.await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&lead, &outcome), "waiter got a different fetch's result");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one fetch should execute");
}

#[tokio::test(start_paused = true)]
async fn refresh_after_completion_starts_a_new_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Semaphore::new(2));
    let coordinator = Coordinator::new(
        "gated",
        GatedSource {
            calls: Arc::clone(&calls),
            gate,
        },
        Duration::from_secs(30),
    );

    coordinator.request_refresh().await.unwrap();
    coordinator.request_refresh().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ── Fail-soft cache ─────────────────────────────────────────────────

#[tokio::test]
async fn failed_refresh_keeps_cache_and_marks_unavailable() {
    let (source, _) = ScriptedSource::new([Ok(1), Err(flaky_error()), Ok(2)]);
    let coordinator = Coordinator::new("scripted", source, Duration::from_secs(30));

    let first = coordinator.first_refresh().await.unwrap();
    assert_eq!(*first, 1);
    assert!(coordinator.snapshot().available);

    let err = coordinator.request_refresh().await.unwrap_err();
    assert!(err.is_connectivity());
    let snapshot = coordinator.snapshot();
    assert!(!snapshot.available, "failure must mark the cache unavailable");
    assert_eq!(**snapshot.require().unwrap(), 1, "stale data must survive the failure");
    assert!(coordinator.last_error().is_some());

    let recovered = coordinator.request_refresh().await.unwrap();
    assert_eq!(*recovered, 2);
    let snapshot = coordinator.snapshot();
    assert!(snapshot.available);
    assert!(coordinator.last_error().is_none());
}

#[tokio::test]
async fn snapshot_before_first_refresh_is_not_yet_fetched() {
    let (source, _) = ScriptedSource::new([Ok(1)]);
    let coordinator = Coordinator::new("scripted", source, Duration::from_secs(30));

    let snapshot = coordinator.snapshot();
    assert!(!snapshot.available);
    assert!(matches!(
        snapshot.require(),
        Err(CoreError::NotYetFetched)
    ));
}

// ── Listener fan-out ────────────────────────────────────────────────

#[tokio::test]
async fn every_listener_sees_every_completed_refresh() {
    let (source, _) = ScriptedSource::new([Ok(1), Err(flaky_error())]);
    let coordinator = Coordinator::new("scripted", source, Duration::from_secs(3600));

    let mut counters = Vec::new();
    let mut handles = Vec::new();
    let availability = Arc::new(std::sync::Mutex::new(Vec::new()));
    for i in 0..3 {
        let counter = Arc::new(AtomicUsize::new(0));
        counters.push(Arc::clone(&counter));
        let availability = (i == 0).then(|| Arc::clone(&availability));
        handles.push(coordinator.register(move |snapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(log) = &availability {
                log.lock().unwrap().push(snapshot.available);
            }
        }));
    }

    coordinator.request_refresh().await.unwrap();
    coordinator.request_refresh().await.unwrap_err();

    for counter in &counters {
        assert_eq!(counter.load(Ordering::SeqCst), 2, "one notification per refresh");
    }
    // Failures notify too, with availability flipped off.
    assert_eq!(*availability.lock().unwrap(), vec![true, false]);

    for handle in &handles {
        coordinator.unregister(handle);
    }
}

#[tokio::test]
async fn unregister_is_idempotent() {
    let (source, _) = ScriptedSource::new([Ok(1)]);
    let coordinator = Coordinator::new("scripted", source, Duration::from_secs(3600));

    let handle = coordinator.register(|_| {});
    coordinator.unregister(&handle);
    coordinator.unregister(&handle);

    // A fresh registration after the double-unregister still works.
    let counter = Arc::new(AtomicUsize::new(0));
    let handle = coordinator.register({
        let counter = Arc::clone(&counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    coordinator.request_refresh().await.unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    coordinator.unregister(&handle);
}

// ── Periodic refresh ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn periodic_task_runs_while_listeners_exist() {
    let interval = Duration::from_secs(30);
    let (source, calls) = ScriptedSource::new([Ok(1)]);
    let coordinator = Coordinator::new("scripted", source, interval);

    let notified = Arc::new(AtomicUsize::new(0));
    let handle = coordinator.register({
        let notified = Arc::clone(&notified);
        move |_| {
            notified.fetch_add(1, Ordering::SeqCst);
        }
    });
    // Registration alone fetches nothing.
    for _ in 0..10 {
        yield_now().await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    for tick in 1..=3 {
        tokio::time::advance(interval).await;
        for _ in 0..10 {
            yield_now().await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), tick);
        assert_eq!(notified.load(Ordering::SeqCst), tick);
    }

    // After the last listener leaves, the clock keeps running but the
    // coordinator stops polling.
    coordinator.unregister(&handle);
    tokio::time::advance(interval * 4).await;
    for _ in 0..10 {
        yield_now().await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn periodic_task_survives_tick_failures() {
    let interval = Duration::from_secs(30);
    let (source, calls) = ScriptedSource::new([Err(flaky_error()), Ok(7)]);
    let coordinator = Coordinator::new("scripted", source, interval);

    let handle = coordinator.register(|_| {});
    // Let the spawned ticker task arm its interval before advancing.
    for _ in 0..10 {
        yield_now().await;
    }

    tokio::time::advance(interval).await;
    for _ in 0..10 {
        yield_now().await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(coordinator.last_error().is_some());

    tokio::time::advance(interval).await;
    for _ in 0..10 {
        yield_now().await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let snapshot = coordinator.snapshot();
    assert!(snapshot.available);
    assert_eq!(**snapshot.require().unwrap(), 7);

    coordinator.unregister(&handle);
}
