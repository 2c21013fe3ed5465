//! Bounded parallel execution of independent API calls.
//!
//! Every unit of work is spawned on the tokio runtime straight away and waits
//! for a permit from a shared semaphore, so at most `pool_size` calls are in
//! flight. Results always come back in input order. A failing unit never
//! cancels its siblings: calls that already reached the server (deletions,
//! publishes) run to completion.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use webflow_core::error::WebflowError;
use crate::WebflowResult;

/// Default number of concurrent in-flight calls
pub const DEFAULT_POOL_SIZE: usize = 50;

/// Units of work that have been spawned but not yet awaited
#[derive(Debug)]
pub struct PendingBatch<T> {
    handles: Vec<JoinHandle<WebflowResult<T>>>,
}

impl<T> PendingBatch<T> {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every unit and return their outcomes in input order
    pub async fn join(self) -> Vec<WebflowResult<T>> {
        let mut results = Vec::with_capacity(self.handles.len());
        for (index, handle) in self.handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(WebflowError::Dispatch {
                    index,
                    message: e.to_string(),
                }),
            };
            results.push(result);
        }
        results
    }

    /// Wait for every unit; fail if any of them failed
    pub async fn try_join(self) -> WebflowResult<Vec<T>> {
        collect_results(self.join().await)
    }
}

/// Spawn one unit of work per input without waiting for any of them.
///
/// Must be called from within a tokio runtime.
pub fn spawn_parallel<I, T, F, Fut>(inputs: Vec<I>, pool_size: usize, work: F) -> WebflowResult<PendingBatch<T>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = WebflowResult<T>> + Send + 'static,
{
    if pool_size == 0 {
        return Err(WebflowError::invalid_argument("pool_size", "must be at least 1"));
    }

    debug!(units = inputs.len(), pool_size, "Dispatching parallel batch");

    let semaphore = Arc::new(Semaphore::new(pool_size));
    let work = Arc::new(work);

    let handles = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let semaphore = Arc::clone(&semaphore);
            let work = Arc::clone(&work);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| WebflowError::Dispatch {
                    index,
                    message: e.to_string(),
                })?;
                (*work)(input).await
            })
        })
        .collect();

    Ok(PendingBatch { handles })
}

/// Run one unit of work per input, at most `pool_size` at a time, and return
/// the results in input order
pub async fn run_parallel<I, T, F, Fut>(inputs: Vec<I>, pool_size: usize, work: F) -> WebflowResult<Vec<T>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = WebflowResult<T>> + Send + 'static,
{
    spawn_parallel(inputs, pool_size, work)?.try_join().await
}

/// Fold a batch result into a single outcome.
///
/// A lone failure is returned as is; several failures are reported together
/// so none of them is masked.
pub fn collect_results<T>(results: Vec<WebflowResult<T>>) -> WebflowResult<Vec<T>> {
    let mut values = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => values.push(value),
            Err(error) => failures.push((index, error)),
        }
    }

    match failures.len() {
        0 => Ok(values),
        1 => Err(failures.remove(0).1),
        _ => Err(WebflowError::Batch { failures }),
    }
}
