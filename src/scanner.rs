
use std::{io, path::Path};

use log::debug;

use crate::{error::Result, tracker::matches_extensions, uploader::UploadTask};

/// Lists the directory's current contents and returns one task per matching
/// regular file, sorted by path. No stability check is applied; files that
/// predate the watcher are assumed complete.
pub async fn scan_existing(directory: &Path, extensions: &[String]) -> Result<Vec<UploadTask>> {
    let mut tasks = vec![];

    let mut entries = tokio::fs::read_dir(directory).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        // An entry can vanish between the listing and the stat call; the
        // sweep is best-effort, so skip it rather than abort the scan.
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };

        if !metadata.is_file() {
            continue;
        }

        if !matches_extensions(&path, extensions) {
            debug!("skipping non-matching file: {}", path.display());
            continue;
        }

        tasks.push(UploadTask::new(path)?);
    }

    tasks.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(tasks)
}
