use std::{
    collections::HashSet,
    path::PathBuf,
    sync::Arc,
};

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::{Result, OK},
    uploader::{UploadOutcome, UploadTask, Uploader},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: UploadOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Runs each task's retry ladder on its own worker so a slow upload can't
/// stall discovery, bounded by a semaphore. The in-flight set enforces one
/// outstanding task per path.
pub struct UploadPool {
    uploader: Arc<Uploader>,
    semaphore: Arc<Semaphore>,
    join_set: JoinSet<(PathBuf, UploadOutcome)>,
    in_flight: HashSet<PathBuf>,
}

impl UploadPool {
    pub fn new(uploader: Uploader, max_jobs: usize) -> Self {
        UploadPool {
            uploader: Arc::new(uploader),
            semaphore: Arc::new(Semaphore::new(max_jobs)),
            join_set: JoinSet::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn in_flight(&self) -> &HashSet<PathBuf> {
        &self.in_flight
    }

    pub async fn submit(&mut self, task: UploadTask) -> Result<()> {
        if !self.in_flight.insert(task.path.clone()) {
            return OK;
        }

        let permit = self.semaphore.clone().acquire_owned().await?;
        let uploader = self.uploader.clone();
        self.join_set.spawn(async move {
            let outcome = uploader.run(&task).await;
            drop(permit);
            (task.path, outcome)
        });
        OK
    }

    /// Collects every task that has already finished without blocking.
    pub fn reap_finished(&mut self, summary: &mut Summary) -> Result<()> {
        while let Some(joined) = self.join_set.try_join_next() {
            let (path, outcome) = joined?;
            self.in_flight.remove(&path);
            summary.record(outcome);
        }

        OK
    }

    /// Waits for every outstanding task, letting in-flight attempts finish.
    pub async fn drain(&mut self, summary: &mut Summary) -> Result<()> {
        while let Some(joined) = self.join_set.join_next().await {
            let (path, outcome) = joined?;
            self.in_flight.remove(&path);
            summary.record(outcome);
        }

        OK
    }
}
