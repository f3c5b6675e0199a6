use std::{env::VarError, fmt::Debug, io};

use aws_sdk_s3::{error::SdkError, primitives::ByteStreamError};
use humantime::DurationError;
use tokio::{sync::AcquireError, task::JoinError};

use super::Error;

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::other(error)
    }
}

impl From<VarError> for Error {
    fn from(error: VarError) -> Self {
        Error::other(error)
    }
}

impl From<JoinError> for Error {
    fn from(error: JoinError) -> Self {
        Error::other(error)
    }
}

impl From<AcquireError> for Error {
    fn from(error: AcquireError) -> Self {
        Error::other(error)
    }
}

impl From<ByteStreamError> for Error {
    fn from(error: ByteStreamError) -> Self {
        Error::other(error)
    }
}

impl From<DurationError> for Error {
    fn from(error: DurationError) -> Self {
        Error::other(error)
    }
}

impl From<notify::Error> for Error {
    fn from(error: notify::Error) -> Self {
        Error::other(error)
    }
}

impl<E: std::error::Error + Send + Sync + 'static, R: Debug + Send + Sync + 'static>
    From<SdkError<E, R>> for Error
{
    fn from(error: SdkError<E, R>) -> Self {
        Error::other(error)
    }
}
