#[cfg(test)]
mod tests;

use std::{ffi::OsStr, path::PathBuf, time::Duration};

use humantime::format_duration;
use log::{error, info, warn};
use tokio::{fs, time::sleep};

use crate::{
    error::{Error, Result, OK},
    store::SharedStore,
};

/// A promoted file plus its derived remote key. Consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub path: PathBuf,
    pub key: String,
}

impl UploadTask {
    pub fn new(path: PathBuf) -> Result<Self> {
        let key = path
            .file_name()
            .and_then(OsStr::to_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| Error::InvalidFileName(path.clone()))?;
        Ok(UploadTask { path, key })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { attempts: u32 },
    Failed { attempts: u32 },
}

impl UploadOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, UploadOutcome::Succeeded { .. })
    }
}

/// Drives one task through the put/verify ladder: up to `max_retries + 1`
/// attempts with exponential backoff, size verification after every put, and
/// local deletion gated on verified success.
#[derive(Debug)]
pub struct Uploader {
    store: SharedStore,
    max_retries: u32,
    initial_delay: Duration,
}

impl Uploader {
    pub fn new(store: SharedStore, max_retries: u32, initial_delay: Duration) -> Self {
        Uploader {
            store,
            max_retries,
            initial_delay,
        }
    }

    pub async fn run(&self, task: &UploadTask) -> UploadOutcome {
        let total_attempts = self.max_retries + 1;
        let mut attempts = 0;

        loop {
            attempts += 1;
            info!(
                "uploading {} as `{}` (attempt {attempts}/{total_attempts})",
                task.path.display(),
                task.key
            );

            match self.attempt(task).await {
                Ok(()) => {
                    self.remove_local(task).await;
                    return UploadOutcome::Succeeded { attempts };
                }
                Err(err) if attempts < total_attempts => {
                    let delay = self.backoff(attempts - 1);
                    warn!(
                        "upload of {} failed: {err}; retrying in {}",
                        task.path.display(),
                        format_duration(delay)
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        "upload of {} failed after {attempts} attempts: {err}",
                        task.path.display()
                    );
                    return UploadOutcome::Failed { attempts };
                }
            }
        }
    }

    async fn attempt(&self, task: &UploadTask) -> Result<()> {
        self.store.put(&task.path, &task.key).await?;
        self.verify(task).await
    }

    // A mismatch means the remote copy can't be trusted, so it fails the
    // attempt and re-enters the ladder rather than terminating the task.
    async fn verify(&self, task: &UploadTask) -> Result<()> {
        let meta = self.store.head(&task.key).await?;
        let local_size = fs::metadata(&task.path).await?.len();

        if meta.size != local_size {
            return Err(Error::SizeMismatch {
                key: task.key.clone(),
                local: local_size,
                remote: meta.size,
            });
        }

        OK
    }

    // The remote copy is the source of truth once verified; a failed delete
    // leaves the task Succeeded and the file for the next reconciliation.
    async fn remove_local(&self, task: &UploadTask) {
        match fs::remove_file(&task.path).await {
            Ok(()) => info!("deleted local file: {}", task.path.display()),
            Err(err) => error!(
                "failed to delete local file {}: {err}",
                task.path.display()
            ),
        }
    }

    pub(crate) fn backoff(&self, attempt: u32) -> Duration {
        self.initial_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}
