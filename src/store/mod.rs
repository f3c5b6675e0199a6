mod local;
mod s3;

use std::{fmt::Debug, path::Path, sync::Arc};

use async_trait::async_trait;

use crate::error::Result;

pub use {local::LocalStore, s3::S3Store};

pub type SharedStore = Arc<dyn Store>;

/// Metadata reported by the remote side for a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMeta {
    pub size: u64,
}

#[async_trait]
pub trait Store: Debug + Send + Sync {
    async fn put(&self, path: &Path, key: &str) -> Result<()>;
    async fn head(&self, key: &str) -> Result<ObjectMeta>;
    #[allow(dead_code)]
    async fn exists(&self, key: &str) -> Result<bool>;
}
