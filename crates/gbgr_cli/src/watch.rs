//! Rebuild on change
//!
//! Watches the export's directory, waits for a quiet period after the last
//! change to the export and then rebuilds inline. Changes that arrive while a
//! build is running are queued and start the next debounce window, so two
//! builds never run at the same time.

use anyhow::{Context, Result};
use gbgr_tokens::{build, BuildOptions, EmitConfig};
use notify::{Event, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;

/// Whether a file system event touches the watched file.
pub fn touches(event: &Event, file_name: &OsString) -> bool {
    !event.kind.is_access()
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

/// Wait until `file_name` changed and then stayed quiet for `debounce`.
///
/// Returns `false` once the event source is gone.
pub async fn next_change(
    rx: &mut UnboundedReceiver<notify::Result<Event>>,
    file_name: &OsString,
    debounce: Duration,
) -> bool {
    // first relevant change
    loop {
        match rx.recv().await {
            Some(Ok(event)) if touches(&event, file_name) => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => tracing::warn!("watch error: {e}"),
            None => return false,
        }
    }

    // quiet period; every further change restarts it
    loop {
        match timeout(debounce, rx.recv()).await {
            Ok(Some(Ok(event))) if touches(&event, file_name) => {
                tracing::trace!("change during debounce, waiting again");
            }
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(e))) => tracing::warn!("watch error: {e}"),
            Ok(None) => return false,
            Err(_) => return true,
        }
    }
}

/// Build once, then rebuild whenever the export changes.
///
/// A failing first build ends watch mode; later failures are logged and the
/// watcher keeps running.
pub fn run(options: &BuildOptions, config: &EmitConfig, debounce: Duration) -> Result<()> {
    build(options, config).context("Initial build failed")?;

    let file_name = options
        .input
        .file_name()
        .map(|n| n.to_os_string())
        .with_context(|| format!("{} does not name a file", options.input.display()))?;
    let dir = match options.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start watch runtime")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })
    .context("Failed to start file watcher")?;
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    tracing::info!(
        "watching {} for changes (press Ctrl+C to stop)",
        options.input.display()
    );

    runtime.block_on(async {
        while next_change(&mut rx, &file_name, debounce).await {
            tracing::info!("change detected, rebuilding...");
            if let Err(e) = build(options, config) {
                tracing::error!("rebuild failed: {e}");
            }
        }
    });

    drop(watcher);
    Ok(())
}
