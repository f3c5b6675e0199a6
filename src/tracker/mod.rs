
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Modified,
}

#[derive(Debug, Clone)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

/// Registry of files seen but not yet stable. A file is promoted once it has
/// gone untouched for the configured age threshold; a fresh event inside the
/// window resets its clock. This inactivity timer is the only write-complete
/// signal available.
#[derive(Debug)]
pub struct Tracker {
    extensions: Vec<String>,
    pending: HashMap<PathBuf, Instant>,
}

impl Tracker {
    pub fn new(extensions: Vec<String>) -> Self {
        Tracker {
            extensions,
            pending: HashMap::new(),
        }
    }

    pub fn record(&mut self, event: &FileEvent, now: Instant) {
        if !self.matches_extensions(&event.path) {
            return;
        }

        if event.kind == FileEventKind::Created || !self.pending.contains_key(&event.path) {
            info!("new file detected: {}", event.path.display());
        }

        self.pending.insert(event.path.clone(), now);
    }

    /// Emits every tracked path that has gone untouched for at least
    /// `age_threshold` and still exists on disk, removing it from tracking.
    /// Vanished paths are dropped without an error; paths in `in_flight`
    /// stay tracked so a path never has two outstanding tasks.
    pub fn sweep_ready(
        &mut self,
        now: Instant,
        age_threshold: Duration,
        in_flight: &HashSet<PathBuf>,
    ) -> Vec<PathBuf> {
        let mut ready = vec![];
        let mut vanished = vec![];

        for (path, last_touched) in &self.pending {
            if now.duration_since(*last_touched) < age_threshold || in_flight.contains(path) {
                continue;
            }

            if path.exists() {
                ready.push(path.clone());
            } else {
                debug!("dropping vanished file: {}", path.display());
                vanished.push(path.clone());
            }
        }

        for path in ready.iter().chain(vanished.iter()) {
            self.pending.remove(path);
        }

        ready
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.pending.contains_key(path)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn matches_extensions(&self, path: &Path) -> bool {
        matches_extensions(path, &self.extensions)
    }
}

/// Case-sensitive suffix match against the configured allow-list.
pub fn matches_extensions(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    extensions.iter().any(|ext| name.ends_with(ext))
}
