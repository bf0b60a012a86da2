//! Filesystem trigger for session rescans
//!
//! Watches the shared folder (non-recursively, matching the flat scan
//! namespace) and requests a rescan after each debounced batch of change
//! events, so peers reconnecting shortly after a change see fresh hashes.

use notify::RecommendedWatcher;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::SyncError;
use crate::logging::*;
use crate::scanner::Folder;
use crate::session::SyncSession;

/// Debounced folder watcher bound to one session.
///
/// Dropping the watcher stops event delivery; the background task ends
/// when the channel closes.
pub struct FolderWatcher {
	_debouncer: Debouncer<RecommendedWatcher>,
}

impl FolderWatcher {
	/// Start watching `path`, marking the session dirty and rescanning
	/// after each debounced batch of events.
	pub fn start<F>(path: &Path, session: Arc<SyncSession<F>>) -> Result<Self, SyncError>
	where
		F: Folder + 'static,
	{
		let (tx, mut rx) = mpsc::channel::<usize>(16);
		let debounce = Duration::from_millis(session.options().debounce_ms);

		let mut debouncer = new_debouncer(
			debounce,
			move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
				Ok(events) if !events.is_empty() => {
					let _ = tx.blocking_send(events.len());
				}
				Ok(_) => {}
				Err(e) => {
					warn!(error = %e, "watch event error");
				}
			},
		)
		.map_err(|e| SyncError::WatchFailed { message: e.to_string() })?;

		debouncer
			.watcher()
			.watch(path, notify::RecursiveMode::NonRecursive)
			.map_err(|e| SyncError::WatchFailed {
				message: format!("{}: {}", path.display(), e),
			})?;

		info!(path = %path.display(), "watching folder for changes");

		tokio::spawn(async move {
			while let Some(event_count) = rx.recv().await {
				debug!(events = event_count, "folder changed, rescanning");
				session.mark_dirty();
				match session.rescan().await {
					Ok(outcome) => {
						debug!(files = outcome.stats.files_seen, "watcher rescan committed")
					}
					// A caller-requested rescan won the race; its result stands
					Err(SyncError::ScanSuperseded) => {}
					Err(e) => {
						warn!(error = %e, "watcher rescan failed");
						session.callbacks().on_error(&e);
					}
				}
			}
		});

		Ok(FolderWatcher { _debouncer: debouncer })
	}
}

// vim: ts=4
