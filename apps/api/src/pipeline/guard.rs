//! Run Guard: single-flight latch around the pipeline.
//!
//! `trigger` claims the flag with one compare-and-swap, spawns the job, and
//! returns without waiting. A `RunPermit` owned by a supervisor task clears
//! the flag when dropped, so normal completion and panics both release it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

/// Proof that the caller holds the flag. Releases it on drop.
#[derive(Debug)]
pub struct RunPermit {
    running: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claims the flag if it is free.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit {
                running: Arc::clone(&self.running),
            })
    }

    /// Starts `job` on the runtime unless a run is already active.
    /// Must be called from within a tokio runtime.
    pub fn trigger<F, Fut>(&self, job: F) -> TriggerOutcome
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(permit) = self.try_acquire() else {
            info!("Run rejected: a job search is already in progress");
            return TriggerOutcome::Rejected;
        };

        info!("Run accepted: starting job search in the background");
        let handle = tokio::spawn(async move { job().await });
        tokio::spawn(async move {
            let _permit = permit;
            match handle.await {
                Ok(()) => info!("Job search finished. Ready for new requests."),
                Err(e) => error!("Job search aborted: {e}. Ready for new requests."),
            }
        });

        TriggerOutcome::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    async fn wait_until_idle(guard: &RunGuard) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while guard.is_running() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("guard was never released");
    }

    #[test]
    fn test_permit_release_on_drop() {
        let guard = RunGuard::new();
        let permit = guard.try_acquire().unwrap();
        assert!(guard.is_running());
        assert!(guard.try_acquire().is_none());
        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_back_to_back_triggers_accept_once() {
        let guard = RunGuard::new();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let first = guard.trigger(move || async move {
            let _ = release_rx.await;
        });
        let second = guard.trigger(|| async {});

        assert_eq!(first, TriggerOutcome::Accepted);
        assert_eq!(second, TriggerOutcome::Rejected);

        release_tx.send(()).unwrap();
        wait_until_idle(&guard).await;
        assert_eq!(guard.trigger(|| async {}), TriggerOutcome::Accepted);
    }

    #[tokio::test]
    async fn test_panicking_run_releases_guard() {
        let guard = RunGuard::new();

        let outcome = guard.trigger(|| async {
            panic!("pipeline blew up");
        });
        assert_eq!(outcome, TriggerOutcome::Accepted);

        wait_until_idle(&guard).await;
        assert_eq!(guard.trigger(|| async {}), TriggerOutcome::Accepted);
    }

    #[tokio::test]
    async fn test_clones_share_one_flag() {
        let guard = RunGuard::new();
        let clone = guard.clone();
        let _permit = guard.try_acquire().unwrap();
        assert_eq!(clone.trigger(|| async {}), TriggerOutcome::Rejected);
    }
}
