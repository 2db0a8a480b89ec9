//! Bounded-concurrency fan-out over independent operations.
//!
//! At most `limit` operations are in flight at once; every item runs exactly
//! once; each result stays attached to its originating item regardless of
//! completion order; one item failing never cancels or blocks its siblings.
//! The fan-out returns only after all results are collected.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

/// The outcome of one fanned-out operation, attached to its item.
#[derive(Debug, Clone)]
pub struct TaskReport<I> {
    /// The item this result belongs to.
    pub item: I,
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Diagnostic text (tool output, failure description). May be empty.
    pub detail: String,
}

impl<I> TaskReport<I> {
    /// A successful outcome.
    pub fn success(item: I, detail: impl Into<String>) -> Self {
        Self {
            item,
            ok: true,
            detail: detail.into(),
        }
    }

    /// A failed outcome.
    pub fn failure(item: I, detail: impl Into<String>) -> Self {
        Self {
            item,
            ok: false,
            detail: detail.into(),
        }
    }
}

/// Observer for fan-out progress.
///
/// `on_complete` fires once per finished item, in completion order (not
/// submission order), with the running completed count. It is a UI side
/// channel only: implementations must not assume any particular order and
/// cannot affect result collection.
pub trait Progress<I>: Send + Sync {
    fn on_complete(&self, completed: usize, total: usize, report: &TaskReport<I>);
}

/// A `Progress` that ignores everything.
pub struct NullProgress;

impl<I> Progress<I> for NullProgress {
    fn on_complete(&self, _completed: usize, _total: usize, _report: &TaskReport<I>) {}
}

/// Run `op` over every item with at most `limit` operations in flight.
///
/// Returns one report per item, in submission order. A panicking operation
/// is mapped to a failed report for its item rather than aborting the run.
/// `limit` is clamped to at least 1.
pub async fn run_bounded<I, F, Fut>(
    items: Vec<I>,
    limit: usize,
    progress: Arc<dyn Progress<I>>,
    op: F,
) -> Vec<TaskReport<I>>
where
    I: Clone + Send + Sync + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = TaskReport<I>> + Send + 'static,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));
    let op = Arc::new(op);

    let mut handles = Vec::with_capacity(total);

    for item in items.iter().cloned() {
        let semaphore = semaphore.clone();
        let completed = completed.clone();
        let progress = progress.clone();
        let op = op.clone();

        let handle = tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only fails if the
            // runtime is tearing down; running unthrottled then is harmless.
            let _permit = semaphore.acquire_owned().await.ok();
            let report = op(item).await;
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            progress.on_complete(done, total, &report);
            report
        });

        handles.push(handle);
    }

    let mut results = Vec::with_capacity(total);
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(report) => results.push(report),
            Err(e) => {
                let report =
                    TaskReport::failure(items[index].clone(), format!("task panicked: {e}"));
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.on_complete(done, total, &report);
                results.push(report);
            }
        }
    }

    results
}
