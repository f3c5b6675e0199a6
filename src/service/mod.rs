
use std::time::Instant;

use log::{info, warn};
use notify::{EventKind, RecursiveMode, Watcher};
use tokio::{sync::mpsc, time};

use crate::{
    config::Config,
    error::{Result, OK},
    pool::{Summary, UploadPool},
    scanner,
    store::SharedStore,
    tracker::{FileEvent, FileEventKind, Tracker},
    uploader::{UploadTask, Uploader},
};

/// Watch the directory for new files, uploading each one once it stabilizes,
/// until a termination signal arrives.
pub async fn run_watch(config: &Config, store: SharedStore) -> Result<Summary> {
    config.validate()?;

    let mut pool = create_pool(config, store);
    let mut summary = Summary::default();
    watch_loop(config, &mut pool, &mut summary).await?;
    pool.drain(&mut summary).await?;
    Ok(summary)
}

/// Sweep up files that predate the watcher, then optionally fall through into
/// watch mode.
pub async fn run_reconcile(
    config: &Config,
    store: SharedStore,
    continue_watching: bool,
) -> Result<Summary> {
    config.validate()?;

    let mut pool = create_pool(config, store);
    let mut summary = Summary::default();
    reconcile(config, &mut pool, &mut summary).await?;
    info!(
        "reconciliation complete: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );

    if continue_watching {
        watch_loop(config, &mut pool, &mut summary).await?;
        pool.drain(&mut summary).await?;
    }

    Ok(summary)
}

fn create_pool(config: &Config, store: SharedStore) -> UploadPool {
    let uploader = Uploader::new(store, config.max_retries, config.initial_delay);
    UploadPool::new(uploader, config.max_jobs)
}

// Best-effort bulk sweep; failures count toward the summary instead of
// halting the batch.
async fn reconcile(config: &Config, pool: &mut UploadPool, summary: &mut Summary) -> Result<()> {
    let tasks = scanner::scan_existing(&config.directory, &config.extensions).await?;
    info!("found {} existing files to upload", tasks.len());

    for task in tasks {
        pool.submit(task).await?;
    }

    pool.drain(summary).await
}

async fn watch_loop(config: &Config, pool: &mut UploadPool, summary: &mut Summary) -> Result<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |event| {
        let _ = sender.send(event);
    })?;
    watcher.watch(&config.directory, RecursiveMode::NonRecursive)?;
    info!("watching {}", config.directory.display());

    let mut tracker = Tracker::new(config.extensions.clone());
    let mut tick = time::interval(config.sweep_interval);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            maybe_event = receiver.recv() => {
                let Some(event_result) = maybe_event else {
                    break;
                };

                match event_result {
                    Ok(event) => {
                        let now = Instant::now();
                        for file_event in translate_event(&event) {
                            tracker.record(&file_event, now);
                        }
                    }
                    Err(err) => warn!("watch error: {err}"),
                }
            }
            _ = tick.tick() => {
                pool.reap_finished(summary)?;

                let now = Instant::now();
                let ready = tracker.sweep_ready(now, config.age_threshold, pool.in_flight());
                for path in ready {
                    pool.submit(UploadTask::new(path)?).await?;
                }
            }
        }
    }

    // Stop accepting events; in-flight attempts finish in the caller's drain.
    drop(watcher);
    info!(
        "stopping with {} file(s) still pending, waiting for in-flight uploads",
        tracker.pending_len()
    );
    OK
}

fn translate_event(event: &notify::Event) -> Vec<FileEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Modify(_) => FileEventKind::Modified,
        _ => return vec![],
    };

    event
        .paths
        .iter()
        .filter(|path| !path.is_dir())
        .map(|path| FileEvent {
            path: path.clone(),
            kind,
        })
        .collect()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received terminate signal"),
    }
}
