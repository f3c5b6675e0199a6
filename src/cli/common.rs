use std::{
    env::{self, VarError},
    ffi::OsStr,
    path::PathBuf,
    sync::Arc,
};

use humantime::parse_duration;

use crate::{
    config::Config,
    error::{Error, Result},
    store::{LocalStore, S3Store, SharedStore},
};

use super::{GlobalArgs, SettingsArgs};

const ENV_VAR_BUCKET: &str = "CLIPSHIP_BUCKET";
const ENV_VAR_LOCAL: &str = "CLIPSHIP_LOCAL";
const ENV_VAR_LATENCY: &str = "CLIPSHIP_LATENCY";

pub async fn create_store(args: &GlobalArgs) -> Result<SharedStore> {
    let mut bucket = args.bucket.clone();
    let mut local = args.local.clone();

    if bucket.is_none() && local.is_none() {
        bucket = get_env_var(ENV_VAR_BUCKET)?;
        local = get_env_var(ENV_VAR_LOCAL)?.map(PathBuf::from);
    }

    let latency = get_env_var(ENV_VAR_LATENCY)?
        .as_deref()
        .map(parse_duration)
        .transpose()?
        .or(args.latency);

    match (bucket, local) {
        (Some(bucket), None) => {
            let store = S3Store::new(bucket, args.region.clone()).await?;
            Ok(Arc::new(store))
        }
        (None, Some(path)) => Ok(Arc::new(LocalStore::new(path, latency))),
        (None, None) => Err(Error::Cli(format!(
            "Either `{ENV_VAR_BUCKET}` or `{ENV_VAR_LOCAL}` must be set"
        ))),
        _ => Err(Error::Cli(format!(
            "`{ENV_VAR_BUCKET}` and `{ENV_VAR_LOCAL}` can't both be set"
        ))),
    }
}

pub fn create_config(directory: PathBuf, settings: &SettingsArgs) -> Config {
    Config {
        directory,
        extensions: settings.extensions.clone(),
        max_retries: settings.max_retries,
        initial_delay: settings.initial_delay,
        age_threshold: settings.age_threshold,
        sweep_interval: settings.sweep_interval,
        max_jobs: settings.jobs,
    }
}

fn get_env_var<T: AsRef<OsStr>>(name: T) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
