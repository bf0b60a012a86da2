//! Error types for ClipSync operations

use std::error::Error;
use std::fmt;
use std::io;

/// Main error type for manifest synchronization
#[derive(Debug)]
pub enum SyncError {
	/// Folder enumeration failed (missing path, permissions)
	DirectoryUnreadable { path: String, source: io::Error },

	/// A single entry could not be read or hashed during a scan
	FileUnreadable { name: String, source: io::Error },

	/// Received manifest has an invalid digest or duplicate keys
	MalformedManifest { reason: String },

	/// A newer rescan started before this one committed; its result was discarded
	ScanSuperseded,

	/// Filesystem watcher could not be started
	WatchFailed { message: String },

	/// Invalid configuration
	InvalidConfig { message: String },

	/// Persistent cache error (nested)
	Cache(CacheError),

	/// I/O error
	Io(io::Error),
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::DirectoryUnreadable { path, source } => {
				write!(f, "Cannot list directory {}: {}", path, source)
			}
			SyncError::FileUnreadable { name, source } => {
				write!(f, "Cannot read file '{}': {}", name, source)
			}
			SyncError::MalformedManifest { reason } => {
				write!(f, "Malformed remote manifest: {}", reason)
			}
			SyncError::ScanSuperseded => write!(f, "Scan superseded by a newer rescan request"),
			SyncError::WatchFailed { message } => {
				write!(f, "Failed to watch folder: {}", message)
			}
			SyncError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			SyncError::Cache(e) => write!(f, "Cache error: {}", e),
			SyncError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for SyncError {}

impl From<io::Error> for SyncError {
	fn from(e: io::Error) -> Self {
		SyncError::Io(e)
	}
}

impl From<CacheError> for SyncError {
	fn from(e: CacheError) -> Self {
		SyncError::Cache(e)
	}
}

/// Persistent hash cache errors
#[derive(Debug)]
pub enum CacheError {
	/// Failed to open or create the cache database
	OpenFailed { source: Box<dyn Error + Send + Sync> },

	/// Failed to read cache entries
	ReadFailed { source: Box<dyn Error + Send + Sync> },

	/// Failed to write cache entries
	WriteFailed { source: Box<dyn Error + Send + Sync> },
}

impl fmt::Display for CacheError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CacheError::OpenFailed { source } => write!(f, "Failed to open cache: {}", source),
			CacheError::ReadFailed { source } => write!(f, "Failed to read cache: {}", source),
			CacheError::WriteFailed { source } => write!(f, "Failed to write cache: {}", source),
		}
	}
}

impl Error for CacheError {}

// vim: ts=4
