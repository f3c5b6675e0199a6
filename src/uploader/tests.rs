use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::time::Instant;

use crate::{
    error::{Error, Result, OK},
    store::{ObjectMeta, Store},
    uploader::{UploadOutcome, UploadTask, Uploader},
};

const MAX_RETRIES: u32 = 3;
const INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Store whose first `put_failures` puts fail, whose head misreports the
/// size for the first `bad_heads` calls, and whose head errors outright for
/// the first `head_errors` calls.
#[derive(Debug)]
struct FlakyStore {
    put_failures: AtomicU32,
    bad_heads: AtomicU32,
    head_errors: AtomicU32,
    puts: AtomicU32,
    sizes: Mutex<Option<u64>>,
}

impl FlakyStore {
    fn new(put_failures: u32, bad_heads: u32) -> Arc<Self> {
        Arc::new(FlakyStore {
            put_failures: AtomicU32::new(put_failures),
            bad_heads: AtomicU32::new(bad_heads),
            head_errors: AtomicU32::new(0),
            puts: AtomicU32::new(0),
            sizes: Mutex::new(None),
        })
    }

    fn failing_heads(head_errors: u32) -> Arc<Self> {
        let store = FlakyStore::new(0, 0);
        store.head_errors.store(head_errors, Ordering::SeqCst);
        store
    }

    fn put_count(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn put(&self, path: &Path, _key: &str) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);

        if self.put_failures.load(Ordering::SeqCst) > 0 {
            self.put_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Cli("simulated put failure".to_owned()));
        }

        let size = fs::metadata(path).unwrap().len();
        *self.sizes.lock().unwrap() = Some(size);
        OK
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta> {
        if self.head_errors.load(Ordering::SeqCst) > 0 {
            self.head_errors.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Cli("simulated head failure".to_owned()));
        }

        let size = self
            .sizes
            .lock()
            .unwrap()
            .ok_or_else(|| Error::ObjectNotFound(key.to_owned()))?;

        if self.bad_heads.load(Ordering::SeqCst) > 0 {
            self.bad_heads.fetch_sub(1, Ordering::SeqCst);
            return Ok(ObjectMeta { size: size + 1 });
        }

        Ok(ObjectMeta { size })
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Ok(self.sizes.lock().unwrap().is_some())
    }
}

fn write_clip(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, vec![0; 1000]).unwrap();
    path
}

fn uploader(store: Arc<FlakyStore>) -> Uploader {
    Uploader::new(store, MAX_RETRIES, INITIAL_DELAY)
}

#[test]
fn task_key_is_base_name() {
    let task = UploadTask::new(PathBuf::from("/videos/clip_a.mp4")).unwrap();
    assert_eq!(task.key, "clip_a.mp4");
}

#[test]
fn backoff_doubles_from_initial_delay() {
    let store = FlakyStore::new(0, 0);
    let uploader = uploader(store);
    assert_eq!(uploader.backoff(0), Duration::from_secs(5));
    assert_eq!(uploader.backoff(1), Duration::from_secs(10));
    assert_eq!(uploader.backoff(2), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn first_attempt_success_deletes_local_file() {
    let dir = TempDir::new().unwrap();
    let path = write_clip(&dir, "clip_a.mp4");
    let store = FlakyStore::new(0, 0);
    let task = UploadTask::new(path.clone()).unwrap();

    let outcome = uploader(store.clone()).run(&task).await;
    assert_eq!(outcome, UploadOutcome::Succeeded { attempts: 1 });
    assert_eq!(store.put_count(), 1);
    assert!(!path.exists());
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_transient_failures_with_backoff() {
    let dir = TempDir::new().unwrap();
    let path = write_clip(&dir, "clip_a.mp4");
    let store = FlakyStore::new(2, 0);
    let task = UploadTask::new(path.clone()).unwrap();

    let start = Instant::now();
    let outcome = uploader(store.clone()).run(&task).await;

    assert_eq!(outcome, UploadOutcome::Succeeded { attempts: 3 });
    assert_eq!(store.put_count(), 3);
    // Two failures sleep 5s then 10s before the winning attempt.
    assert_eq!(start.elapsed(), Duration::from_secs(15));
    assert!(!path.exists());
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_fail_and_keep_local_file() {
    let dir = TempDir::new().unwrap();
    let path = write_clip(&dir, "clip_a.mp4");
    let store = FlakyStore::new(u32::MAX, 0);
    let task = UploadTask::new(path.clone()).unwrap();

    let start = Instant::now();
    let outcome = uploader(store.clone()).run(&task).await;

    assert_eq!(outcome, UploadOutcome::Failed { attempts: 4 });
    assert_eq!(store.put_count(), 4);
    assert_eq!(start.elapsed(), Duration::from_secs(5 + 10 + 20));
    assert!(path.exists());
}

#[tokio::test(start_paused = true)]
async fn size_mismatch_consumes_a_retry() {
    let dir = TempDir::new().unwrap();
    let path = write_clip(&dir, "clip_a.mp4");
    let store = FlakyStore::new(0, 1);
    let task = UploadTask::new(path.clone()).unwrap();

    let outcome = uploader(store.clone()).run(&task).await;
    assert_eq!(outcome, UploadOutcome::Succeeded { attempts: 2 });
    assert_eq!(store.put_count(), 2);
    assert!(!path.exists());
}

#[tokio::test(start_paused = true)]
async fn head_error_consumes_a_retry() {
    let dir = TempDir::new().unwrap();
    let path = write_clip(&dir, "clip_a.mp4");
    let store = FlakyStore::failing_heads(1);
    let task = UploadTask::new(path.clone()).unwrap();

    let outcome = uploader(store.clone()).run(&task).await;
    assert_eq!(outcome, UploadOutcome::Succeeded { attempts: 2 });
    assert_eq!(store.put_count(), 2);
    assert!(!path.exists());
}

#[tokio::test(start_paused = true)]
async fn failed_local_delete_keeps_task_succeeded() {
    let dir = TempDir::new().unwrap();
    // A directory can't be unlinked, so the delete fails after the upload
    // has verified.
    let path = dir.path().join("clip_a.mp4");
    fs::create_dir(&path).unwrap();
    let store = FlakyStore::new(0, 0);
    let task = UploadTask::new(path.clone()).unwrap();

    let outcome = uploader(store.clone()).run(&task).await;
    assert_eq!(outcome, UploadOutcome::Succeeded { attempts: 1 });
    assert_eq!(store.put_count(), 1);
    assert!(path.exists());
}

#[tokio::test(start_paused = true)]
async fn persistent_size_mismatch_is_terminal() {
    let dir = TempDir::new().unwrap();
    let path = write_clip(&dir, "clip_a.mp4");
    let store = FlakyStore::new(0, u32::MAX);
    let task = UploadTask::new(path.clone()).unwrap();

    let outcome = uploader(store.clone()).run(&task).await;
    assert_eq!(outcome, UploadOutcome::Failed { attempts: 4 });
    assert!(path.exists());
}
