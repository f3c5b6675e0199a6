mod from;

use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const OK: Result<()> = Ok(());

#[derive(Error, Debug)]
pub enum Error {
    #[error("`{0}` does not exist")]
    DirectoryDoesNotExist(PathBuf),

    #[error("`{0}` is not a directory")]
    FileIsNotDirectory(PathBuf),

    #[error("no object found for key `{0}`")]
    ObjectNotFound(String),

    #[error("object `{0}` has no reported size")]
    ObjectSizeUnknown(String),

    #[error("object `{key}` has size {remote}, expected {local}")]
    SizeMismatch {
        key: String,
        local: u64,
        remote: u64,
    },

    #[error("file name of `{0}` is not valid UTF-8")]
    InvalidFileName(PathBuf),

    #[error("{0}")]
    Cli(String),

    #[error(transparent)]
    Other(AnyError),
}

#[derive(Error, Debug)]
pub struct AnyError(anyhow::Error);

impl Display for AnyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error {
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(AnyError(error.into()))
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Other(AnyError(error))
    }
}
