//! Stateful sync session: owns one folder's manifest cache and
//! orchestrates rescans and reconciliations over its lifetime.
//!
//! The session keeps the last committed manifest plus, per file, the
//! `(size, mtime)` pair observed at hash time, so repeated rescans only
//! rehash files that actually changed. Reconciling against a remote
//! manifest lazily rescans first when no fresh manifest exists.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::cache::ManifestCache;
use crate::callbacks::{NoCallbacks, SyncCallbacks};
use crate::config::SessionOptions;
use crate::diff::diff;
use crate::error::SyncError;
use crate::logging::*;
use crate::manifest::{DiffResult, FileRecord, Manifest};
use crate::scanner::{EntryKind, Folder, HashManifestBuilder};

/// Instrumentation for one committed rescan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
	/// Regular files enumerated
	pub files_seen: usize,

	/// Files whose content was actually hashed
	pub files_hashed: usize,

	/// Files whose cached hash was reused (size and mtime unchanged)
	pub cache_hits: usize,
}

/// Result of a committed rescan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
	pub manifest: Arc<Manifest>,
	pub stats: ScanStats,
}

struct SessionState {
	manifest: Option<Arc<Manifest>>,
	records: BTreeMap<String, FileRecord>,
}

/// Orchestrator for repeated scanning and diffing of one shared folder.
///
/// At most one rescan result is committed per request generation: when a
/// newer rescan starts while an older one is still running, the older
/// result is discarded (`ScanSuperseded`) rather than served stale.
/// Manifests are handed out as immutable `Arc` snapshots, so a reconcile
/// may run concurrently with a scan and always sees consistent state.
pub struct SyncSession<F: Folder> {
	builder: HashManifestBuilder<F>,
	options: SessionOptions,
	callbacks: Box<dyn SyncCallbacks>,
	persist: Option<ManifestCache>,
	state: Mutex<SessionState>,
	latest_generation: AtomicU64,

	// Change notifications are counted, not flagged: a committed scan
	// records the epoch it observed at enumeration time, so a failed or
	// superseded scan never consumes a notification, and a change
	// arriving mid-scan stays visible after the commit
	change_epoch: AtomicU64,
	clean_epoch: AtomicU64,
}

impl<F: Folder> SyncSession<F> {
	/// Create a session for one folder.
	///
	/// When persistence is configured, cached records are loaded so the
	/// first rescan after a restart reuses hashes of unchanged files.
	pub fn new(folder: F, options: SessionOptions) -> Result<Self, SyncError> {
		options.validate()?;

		let mut records = BTreeMap::new();
		let persist = match options.cache_db_path() {
			Some(db_path) => {
				if let Some(parent) = db_path.parent() {
					std::fs::create_dir_all(parent)?;
				}
				let cache = ManifestCache::open(&db_path)?;
				records = cache.load()?;
				debug!(entries = records.len(), "loaded persistent hash cache");
				Some(cache)
			}
			None => None,
		};

		Ok(SyncSession {
			builder: HashManifestBuilder::new(folder),
			options,
			callbacks: Box::new(NoCallbacks),
			persist,
			state: Mutex::new(SessionState { manifest: None, records }),
			latest_generation: AtomicU64::new(0),
			change_epoch: AtomicU64::new(0),
			clean_epoch: AtomicU64::new(0),
		})
	}

	/// Attach an event handler (transport, UI bridge)
	pub fn with_callbacks(mut self, callbacks: Box<dyn SyncCallbacks>) -> Self {
		self.callbacks = callbacks;
		self
	}

	pub fn options(&self) -> &SessionOptions {
		&self.options
	}

	pub fn callbacks(&self) -> &dyn SyncCallbacks {
		self.callbacks.as_ref()
	}

	/// Last committed manifest, if any rescan has completed yet
	pub async fn current_manifest(&self) -> Option<Arc<Manifest>> {
		self.state.lock().await.manifest.clone()
	}

	/// Note an external change; the next reconcile rescans lazily.
	///
	/// The notification stays pending until a rescan that observed it
	/// actually commits — a failed rescan does not consume it.
	pub fn mark_dirty(&self) {
		self.change_epoch.fetch_add(1, Ordering::SeqCst);
	}

	fn is_clean(&self) -> bool {
		self.change_epoch.load(Ordering::SeqCst) == self.clean_epoch.load(Ordering::SeqCst)
	}

	/// Re-enumerate the folder, reusing cached hashes for entries whose
	/// `(size, mtime)` pair is unchanged since they were last hashed.
	///
	/// Each call takes a fresh request generation. A completing scan
	/// commits only if it is still the newest request; a superseded scan
	/// discards its result and returns `ScanSuperseded`. Hashing of an
	/// individual file is never preempted mid-file.
	pub async fn rescan(&self) -> Result<ScanOutcome, SyncError> {
		let generation = self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1;
		let scan_id = Uuid::new_v4();
		debug!(%scan_id, generation, "starting rescan");

		// Snapshot the cached records up front so the scan itself runs
		// without holding the session lock; the change epoch is captured
		// here too, so marks arriving mid-scan survive the commit below
		let cached = self.state.lock().await.records.clone();
		let observed_epoch = self.change_epoch.load(Ordering::SeqCst);

		let mut stats = ScanStats::default();
		let mut records = Vec::new();

		for entry in self.builder.list().await? {
			match entry.kind {
				EntryKind::Dir => continue,
				EntryKind::SymLink => {
					return Err(SyncError::FileUnreadable {
						name: entry.name,
						source: std::io::Error::new(
							std::io::ErrorKind::InvalidInput,
							"symbolic links are not followed",
						),
					});
				}
				EntryKind::File => {}
			}
			stats.files_seen += 1;

			// Cooperative cancellation between files
			if self.latest_generation.load(Ordering::SeqCst) != generation {
				debug!(%scan_id, "rescan superseded mid-scan");
				return Err(SyncError::ScanSuperseded);
			}

			let content_hash = match cached.get(&entry.name) {
				Some(record) if record.size == entry.size && record.mtime == entry.mtime => {
					stats.cache_hits += 1;
					record.content_hash.clone()
				}
				_ => {
					stats.files_hashed += 1;
					self.builder.hash_entry(&entry.name).await?
				}
			};

			records.push(FileRecord {
				name: entry.name,
				content_hash,
				size: entry.size,
				mtime: entry.mtime,
			});
		}

		let manifest = Arc::new(Manifest::from_records(&records));

		// Commit only if no newer request has started in the meantime
		{
			let mut state = self.state.lock().await;
			if self.latest_generation.load(Ordering::SeqCst) != generation {
				info!(%scan_id, "discarding superseded scan result");
				return Err(SyncError::ScanSuperseded);
			}
			state.records =
				records.iter().map(|r| (r.name.clone(), r.clone())).collect();
			state.manifest = Some(manifest.clone());
			self.clean_epoch.store(observed_epoch, Ordering::SeqCst);
		}

		if let Some(cache) = &self.persist {
			cache.store(&records)?;
		}

		info!(
			%scan_id,
			files = stats.files_seen,
			hashed = stats.files_hashed,
			reused = stats.cache_hits,
			"rescan committed"
		);
		self.callbacks.on_scan_complete(&stats);

		Ok(ScanOutcome { manifest, stats })
	}

	/// Diff the current local manifest against a remote peer's manifest,
	/// publishing the result to the session callbacks.
	///
	/// Rescans lazily first when no manifest has been committed yet or
	/// the folder was marked dirty since the last scan. The remote
	/// manifest is valid by construction (`Manifest` cannot hold a
	/// malformed digest or duplicate name).
	pub async fn reconcile(&self, remote: &Manifest) -> Result<DiffResult, SyncError> {
		let local = match self.current_manifest().await {
			Some(manifest) if self.is_clean() => manifest,
			_ => self.rescan().await?.manifest,
		};

		let result = diff(&local, remote);
		debug!(
			local = local.len(),
			remote = remote.len(),
			classified = result.len(),
			"reconcile complete"
		);
		self.callbacks.on_diff(&result);

		Ok(result)
	}
}

// vim: ts=4
