//! Periodic refresh for views that poll the backend.
//!
//! DESIGN
//! ======
//! Each poller is one tokio task ticking on an interval. The returned
//! `PollHandle` owns the task: dropping it (the view going away) aborts the
//! task, so no tick ever runs against a view that no longer exists. A tick
//! can also end the poller itself by returning `ControlFlow::Break`, which
//! is how a view stops once its session is gone. The first tick fires
//! immediately, matching a view's initial fetch.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::error::ApiError;

/// Overview stats and the overview address list.
pub const STATS_REFRESH: Duration = Duration::from_secs(30);
/// Address list page.
pub const EMAILS_REFRESH: Duration = Duration::from_secs(10);
/// Messages of one address.
pub const MESSAGES_REFRESH: Duration = Duration::from_secs(10);

/// Aborts the polling task on drop.
#[must_use = "dropping the handle stops the poller"]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the poller to end on its own (a tick returned `Break` or
    /// panicked) without aborting it.
    pub async fn join(mut self) {
        let _ = (&mut self.task).await;
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `tick` every `every`, starting now, until it returns `Break`. Slow
/// ticks push the schedule back instead of bursting to catch up.
pub fn spawn_poll<F, Fut>(every: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ControlFlow<()>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tick().await.is_break() {
                break;
            }
        }
    });
    PollHandle { task }
}

/// Refresh a view: `fetch` every `every`, each success handed to `render`.
/// A 401 ends the poller, since the logout stage has already torn the
/// session down. Any other error is logged and the next tick tries again.
pub fn spawn_view_refresh<T, F, Fut, R>(every: Duration, mut fetch: F, render: R) -> PollHandle
where
    T: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    R: Fn(T) + Send + Sync + 'static,
{
    let render = Arc::new(render);
    spawn_poll(every, move || {
        let pending = fetch();
        let render = Arc::clone(&render);
        async move {
            match pending.await {
                Ok(value) => {
                    render(value);
                    ControlFlow::Continue(())
                }
                Err(e) if e.is_unauthorized() => {
                    info!("session rejected; stopping refresh");
                    ControlFlow::Break(())
                }
                Err(e) => {
                    warn!(error = %e, "refresh failed");
                    ControlFlow::Continue(())
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "poll_test.rs"]
mod tests;
