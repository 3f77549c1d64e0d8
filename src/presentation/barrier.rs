//! # Task Barrier
//!
//! Join point for presentation tasks that play at the same time.

use crate::{PresentationTask, WaveboundError, WaveboundResult};
use log::{debug, warn};
use tokio::task::JoinSet;

/// A set of named tasks that must all settle before the owner continues.
///
/// Tasks start running as soon as they are spawned. [`TaskBarrier::wait`]
/// returns only once every spawned task has finished, so a caller can never
/// move past the barrier while one of them is still playing.
///
/// Spawning requires a running tokio runtime.
#[derive(Debug, Default)]
pub struct TaskBarrier {
    tasks: JoinSet<String>,
}

impl TaskBarrier {
    /// Creates an empty barrier.
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    /// Starts a task under the barrier.
    pub fn spawn(&mut self, name: impl Into<String>, task: PresentationTask) {
        let name = name.into();
        debug!("Barrier task '{}' started", name);
        self.tasks.spawn(async move {
            task.await;
            name
        });
    }

    /// Number of tasks that have not been waited on yet.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether there is nothing left to wait on.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every spawned task to settle.
    ///
    /// Returns task names in completion order. If any task panicked or was
    /// cancelled, the remaining tasks are still drained before the first
    /// failure is reported.
    pub async fn wait(&mut self) -> WaveboundResult<Vec<String>> {
        let mut finished = Vec::with_capacity(self.tasks.len());
        let mut failure = None;

        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(name) => {
                    debug!("Barrier task '{}' finished", name);
                    finished.push(name);
                }
                Err(err) => {
                    warn!("Barrier task failed: {}", err);
                    failure.get_or_insert_with(|| err.to_string());
                }
            }
        }

        match failure {
            Some(reason) => Err(WaveboundError::TaskFailed(reason)),
            None => Ok(finished),
        }
    }
}
