//! # ClipSync - Content-Hash Manifest Synchronizer
//!
//! Core of a peer-to-peer shared-media sync engine: fingerprints every
//! file in a shared folder by SHA-256 content hash and reconciles that
//! fingerprint set against a manifest supplied by a remote peer,
//! classifying each filename as `Missing` (should be fetched),
//! `Additional` (should be offered) or `Conflicting` (same name,
//! different content).
//!
//! Transport, UI and conflict resolution policy are collaborator
//! concerns: they hand the session a folder and a remote manifest and
//! receive a diff to react to.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clipsync::{LocalFolder, Manifest, SessionOptions, SyncSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), clipsync::SyncError> {
//!     let session = SyncSession::new(LocalFolder::new("./shared"), SessionOptions::default())?;
//!     let remote = Manifest::from_json_str(r#"{"clip1.mov": "9f86d081..."}"#)?;
//!     for (name, condition) in session.reconcile(&remote).await? {
//!         println!("{:?}\t{}", condition, name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod callbacks;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod scanner;
pub mod session;
pub mod watcher;

// Re-export commonly used types and functions
pub use callbacks::{CallbackBuilder, NoCallbacks, SyncCallbacks};
pub use config::SessionOptions;
pub use diff::diff;
pub use error::{CacheError, SyncError};
pub use manifest::{DiffResult, FileCondition, FileRecord, Manifest};
pub use scanner::{Folder, FolderEntry, HashManifestBuilder, LocalFolder};
pub use session::{ScanOutcome, ScanStats, SyncSession};
pub use watcher::FolderWatcher;

// vim: ts=4
