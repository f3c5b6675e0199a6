use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{fs, time::sleep};

use crate::error::{Error, Result, OK};

use super::{ObjectMeta, Store};

/// Directory-backed store for development and tests.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    latency: Option<Duration>,
}

impl LocalStore {
    pub fn new(path: PathBuf, latency: Option<Duration>) -> Self {
        LocalStore { path, latency }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.path.join(key)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }
    }
}

#[async_trait]
impl Store for LocalStore {
    async fn put(&self, path: &Path, key: &str) -> Result<()> {
        self.simulate_latency().await;

        fs::create_dir_all(&self.path).await?;
        fs::copy(path, self.object_path(key)).await?;
        OK
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        self.simulate_latency().await;

        let metadata = match fs::metadata(self.object_path(key)).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(key.to_owned()));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(ObjectMeta {
            size: metadata.len(),
        })
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.simulate_latency().await;

        let exists = fs::try_exists(self.object_path(key)).await?;
        Ok(exists)
    }
}
