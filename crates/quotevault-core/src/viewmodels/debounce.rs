//! Version-based debouncing.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs only the most recently scheduled task, after a quiet period.
///
/// Each [`Debouncer::schedule`] bumps a version; the spawned task sleeps for
/// the delay and then runs only if no newer version exists. The check happens
/// once, before the task starts; a task already running is never interrupted.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    version: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `task`, superseding anything still waiting.
    ///
    /// The handle resolves to whether `task` ran.
    pub fn schedule<F>(&self, task: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let scheduled = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let version = Arc::clone(&self.version);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if version.load(Ordering::SeqCst) != scheduled {
                return false;
            }
            task.await;
            true
        })
    }

    /// Drop whatever is waiting.
    pub fn cancel(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }
}
