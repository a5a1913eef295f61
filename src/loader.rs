//! Async resource loading lifecycle
//!
//! One loader owns one remotely fetched resource and exposes the classic
//! `{data, loading, error}` triple to whichever view renders it. The view
//! calls [`ResourceLoader::start`] when it becomes active, [`refetch`] on
//! user demand, and drops (or [`deactivate`]s) the loader when it goes away.
//!
//! ## Attempt ordering
//!
//! Every `start`/`refetch` gets a monotonically increasing attempt number.
//! A completion is applied only if its attempt is still the newest and the
//! loader is still active, so a slow superseded fetch can never overwrite a
//! newer result and nothing is written after deactivation. In-flight I/O is
//! not torn down; its effect on state is suppressed.
//!
//! ## Failure policy
//!
//! Faults from the retrieval operation are collapsed into the single
//! user-facing message [`FETCH_ERROR_MESSAGE`]; the underlying error is
//! logged. Previously loaded data is retained across a failed refetch so a
//! transient fault does not blank the view.
//!
//! [`refetch`]: ResourceLoader::refetch
//! [`deactivate`]: ResourceLoader::deactivate

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Message surfaced to consumers when a retrieval operation fails.
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching data.";

/// Snapshot of a loader's lifecycle: what the owning view renders.
#[derive(Clone, Debug)]
pub struct ResourceState<T> {
    /// Last successfully retrieved value, if any. Retained across failed
    /// refetches (stale-while-error).
    pub data: Option<T>,
    /// True while an attempt is in flight.
    pub loading: bool,
    /// Non-empty message if the most recent attempt failed.
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> ResourceState<T> {
    /// True once no attempt is in flight (initial, succeeded, or failed).
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

type Retrieve<T> =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<T>> + Send>> + Send + Sync>;

/// Runs a caller-supplied retrieval operation and publishes its outcome.
///
/// The loader is owned by exactly one view; consumers observe state via
/// [`subscribe`] or poll it via [`state`]. Dropping the loader deactivates
/// it, which bars any still-running attempt from touching state.
///
/// [`subscribe`]: ResourceLoader::subscribe
/// [`state`]: ResourceLoader::state
pub struct ResourceLoader<T> {
    retrieve: Retrieve<T>,
    state_tx: watch::Sender<ResourceState<T>>,
    /// Number of the most recently started attempt; 0 = none yet.
    attempt: Arc<AtomicU64>,
    active: Arc<AtomicBool>,
}

impl<T: Send + Sync + 'static> ResourceLoader<T> {
    /// Create an idle loader around a zero-argument retrieval operation.
    ///
    /// No attempt is started; the owning view calls [`start`] once when it
    /// becomes active (not once per render).
    ///
    /// [`start`]: ResourceLoader::start
    pub fn new<F, Fut>(retrieve: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (state_tx, _) = watch::channel(ResourceState::default());
        Self {
            retrieve: Arc::new(move || Box::pin(retrieve())),
            state_tx,
            attempt: Arc::new(AtomicU64::new(0)),
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Begin an attempt: set `loading = true` and clear any previous error
    /// synchronously, then invoke the retrieval operation exactly once and
    /// apply its outcome when it completes.
    ///
    /// Safe to call while a previous attempt is still in flight; the older
    /// attempt's completion is discarded.
    pub fn start(&self) {
        if !self.active.load(Ordering::SeqCst) {
            log::debug!("[tubex][loader] start ignored: loader deactivated");
            return;
        }
        let seq = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let fut = (self.retrieve)();
        let state_tx = self.state_tx.clone();
        let attempt = Arc::clone(&self.attempt);
        let active = Arc::clone(&self.active);
        tokio::spawn(async move {
            let outcome = fut.await;
            // The staleness check and the publish must happen under the
            // watch channel's lock: a concurrent refetch may bump `attempt`
            // at any point, and a stale completion that passed a separate
            // check could land after the newer attempt's loading state.
            let applied = state_tx.send_if_modified(|s| {
                if !active.load(Ordering::SeqCst) || attempt.load(Ordering::SeqCst) != seq {
                    return false;
                }
                match outcome {
                    Ok(value) => {
                        s.data = Some(value);
                        s.error = None;
                    }
                    Err(e) => {
                        log::warn!("[tubex][loader] attempt {seq} failed: {e:#}");
                        s.error = Some(FETCH_ERROR_MESSAGE.to_string());
                    }
                }
                s.loading = false;
                true
            });
            if !applied {
                log::debug!("[tubex][loader] attempt {seq} superseded, result discarded");
            }
        });
    }

    /// Re-run the retrieval operation. Equivalent to [`start`].
    ///
    /// [`start`]: ResourceLoader::start
    pub fn refetch(&self) {
        self.start();
    }

    /// Subscribe to state changes. A receiver created after an attempt has
    /// settled sees the final state immediately.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state_tx.subscribe()
    }

    /// Bar all further state mutation, including from attempts already in
    /// flight. Called automatically on drop.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
        // Wake settled() waiters; the published values are untouched.
        self.state_tx.send_modify(|_| {});
    }
}

impl<T: Clone + Send + Sync + 'static> ResourceLoader<T> {
    /// Current state snapshot.
    pub fn state(&self) -> ResourceState<T> {
        self.state_tx.borrow().clone()
    }

    /// Wait until no attempt is in flight and return that state.
    ///
    /// If the loader is deactivated while an attempt is in flight, the
    /// state stays frozen with `loading = true`; this returns the frozen
    /// snapshot rather than waiting for a completion that will never be
    /// published.
    pub async fn settled(&self) -> ResourceState<T> {
        let mut rx = self.state_tx.subscribe();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.is_settled() || !self.active.load(Ordering::SeqCst) {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return snapshot;
            }
        }
    }
}

impl<T> Drop for ResourceLoader<T> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn loading_set_synchronously_on_start() {
        let loader = ResourceLoader::new(|| async { Ok(42u32) });
        assert!(!loader.state().loading);
        loader.start();
        // Before yielding to the runtime at all.
        assert!(loader.state().loading);
        assert!(loader.state().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn error_cleared_when_new_attempt_starts() {
        let fail = Arc::new(AtomicBool::new(true));
        let fail_c = Arc::clone(&fail);
        let loader = ResourceLoader::new(move || {
            let fail = Arc::clone(&fail_c);
            async move {
                if fail.load(Ordering::SeqCst) {
                    Err(anyhow!("backend unavailable"))
                } else {
                    Ok("ok".to_string())
                }
            }
        });

        loader.start();
        let state = loader.settled().await;
        assert_eq!(state.error.as_deref(), Some(FETCH_ERROR_MESSAGE));

        fail.store(false, Ordering::SeqCst);
        loader.refetch();
        // The stale error must be gone the moment the refetch begins.
        let mid = loader.state();
        assert!(mid.loading);
        assert!(mid.error.is_none());

        let state = loader.settled().await;
        assert_eq!(state.data.as_deref(), Some("ok"));
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn retrieve_invoked_exactly_once_per_start() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_c = Arc::clone(&calls);
        let loader = ResourceLoader::new(move || {
            let calls = Arc::clone(&calls_c);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1u8)
            }
        });

        loader.start();
        loader.settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        loader.refetch();
        loader.settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_deactivate_is_a_no_op() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_c = Arc::clone(&calls);
        let loader = ResourceLoader::new(move || {
            let calls = Arc::clone(&calls_c);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        loader.deactivate();
        loader.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!loader.state().loading);
    }
}
