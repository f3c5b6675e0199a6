use std::path::Path;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, primitives::ByteStream, Client,
};
use log::debug;

use crate::error::{Error, Result, OK};

use super::{ObjectMeta, Store};

#[derive(Debug)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn new(bucket: String, region: Option<String>) -> Result<Self> {
        let mut loader = aws_config::from_env();
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }

        let s3_config = loader.load().await;
        let client = Client::new(&s3_config);
        let store = S3Store { client, bucket };
        store.check_bucket().await?;
        Ok(store)
    }

    // Fails fast on a missing bucket or bad credentials instead of
    // burning retries on the first upload.
    async fn check_bucket(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await?;

        debug!("connected to bucket `{}`", self.bucket);
        OK
    }
}

#[async_trait]
impl Store for S3Store {
    async fn put(&self, path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(path).await?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        OK
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                HeadObjectError::NotFound(_) => Error::ObjectNotFound(key.to_owned()),
                err => Error::other(err),
            })?;

        let size_signed = response
            .content_length()
            .ok_or_else(|| Error::ObjectSizeUnknown(key.to_owned()))?;
        let size = u64::try_from(size_signed)
            .map_err(|_| Error::ObjectSizeUnknown(key.to_owned()))?;
        Ok(ObjectMeta { size })
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let response_result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(SdkError::into_service_error);

        match response_result {
            Ok(_) => Ok(true),
            Err(HeadObjectError::NotFound(_)) => Ok(false),
            Err(err) => Err(Error::other(err)),
        }
    }
}
