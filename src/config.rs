use std::{path::PathBuf, time::Duration};

use crate::error::{Error, Result, OK};

/// Read-only settings shared by the tracker, uploader, and service loop.
#[derive(Debug, Clone)]
pub struct Config {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub age_threshold: Duration,
    pub sweep_interval: Duration,
    pub max_jobs: usize,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.directory.exists() {
            return Err(Error::DirectoryDoesNotExist(self.directory.clone()));
        }

        if !self.directory.is_dir() {
            return Err(Error::FileIsNotDirectory(self.directory.clone()));
        }

        OK
    }
}
