//! Folder scanning and content hashing
//!
//! The scanner enumerates the direct entries of one folder (no recursion)
//! and hashes every regular file with SHA-256. Folder access goes through
//! the `Folder` trait so tests can substitute an in-memory double for the
//! real filesystem.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::SyncError;
use crate::manifest::FileRecord;

/// Buffer size for streaming file content into the hasher
const HASH_BUF_SIZE: usize = 64 * 1024;

/// Kind of a directory entry, as far as scanning cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	File,
	Dir,
	SymLink,
}

/// One direct entry of a folder listing
#[derive(Debug, Clone)]
pub struct FolderEntry {
	pub name: String,
	pub kind: EntryKind,
	pub size: u64,

	/// Modification time, nanoseconds since the Unix epoch
	pub mtime: i64,
}

/// Capability to enumerate and read one folder.
///
/// Injected into the scanner instead of binding to a process-wide
/// filesystem, so unit tests can run against an in-memory folder double.
#[async_trait]
pub trait Folder: Send + Sync {
	/// List direct entries; no recursion, symlinks are not followed
	async fn list(&self) -> Result<Vec<FolderEntry>, SyncError>;

	/// Open a named entry for reading its full byte content
	async fn open(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, SyncError>;
}

/// Folder access over the real filesystem
pub struct LocalFolder {
	path: PathBuf,
}

impl LocalFolder {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		LocalFolder { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

fn mtime_nanos(t: SystemTime) -> i64 {
	match t.duration_since(UNIX_EPOCH) {
		Ok(d) => d.as_nanos() as i64,
		Err(e) => -(e.duration().as_nanos() as i64),
	}
}

#[async_trait]
impl Folder for LocalFolder {
	async fn list(&self) -> Result<Vec<FolderEntry>, SyncError> {
		let dir_error = |e: io::Error| SyncError::DirectoryUnreadable {
			path: self.path.display().to_string(),
			source: e,
		};

		let mut read_dir = fs::read_dir(&self.path).await.map_err(dir_error)?;
		let mut entries = Vec::new();

		while let Some(entry) = read_dir.next_entry().await.map_err(dir_error)? {
			let name = entry.file_name().to_string_lossy().into_owned();
			let file_error = |e: io::Error| SyncError::FileUnreadable {
				name: name.clone(),
				source: e,
			};

			// file_type/metadata on a DirEntry do not traverse symlinks,
			// so a link shows up as SymLink rather than as its target
			let file_type = entry.file_type().await.map_err(&file_error)?;
			let kind = if file_type.is_dir() {
				EntryKind::Dir
			} else if file_type.is_symlink() {
				EntryKind::SymLink
			} else {
				EntryKind::File
			};

			let meta = entry.metadata().await.map_err(&file_error)?;
			let mtime = meta.modified().map(mtime_nanos).map_err(&file_error)?;

			entries.push(FolderEntry { name, kind, size: meta.len(), mtime });
		}

		Ok(entries)
	}

	async fn open(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, SyncError> {
		let file = fs::File::open(self.path.join(name)).await.map_err(|e| {
			SyncError::FileUnreadable { name: name.to_string(), source: e }
		})?;
		Ok(Box::new(file))
	}
}

/// Streaming SHA-256 over a reader, rendered as lowercase hex
pub async fn hash_reader<R>(reader: &mut R) -> io::Result<String>
where
	R: AsyncRead + Unpin + ?Sized,
{
	let mut hasher = Sha256::new();
	let mut buf = vec![0u8; HASH_BUF_SIZE];

	loop {
		let n = reader.read(&mut buf).await?;
		if n == 0 {
			break;
		}
		hasher.update(&buf[..n]);
	}

	Ok(hex::encode(hasher.finalize()))
}

/// Scans one folder and produces content-hash records.
pub struct HashManifestBuilder<F: Folder> {
	folder: F,
}

impl<F: Folder> HashManifestBuilder<F> {
	pub fn new(folder: F) -> Self {
		HashManifestBuilder { folder }
	}

	pub fn folder(&self) -> &F {
		&self.folder
	}

	/// List the folder's direct entries
	pub async fn list(&self) -> Result<Vec<FolderEntry>, SyncError> {
		self.folder.list().await
	}

	/// Hash one named entry (full byte stream)
	pub async fn hash_entry(&self, name: &str) -> Result<String, SyncError> {
		let mut reader = self.folder.open(name).await?;
		hash_reader(reader.as_mut()).await.map_err(|e| {
			SyncError::FileUnreadable { name: name.to_string(), source: e }
		})
	}

	/// Enumerate direct entries and hash every regular file.
	///
	/// The scan fails on the first unreadable entry, so an empty result
	/// always means a legitimately empty folder, never a masked failure.
	/// Subdirectories are skipped (the namespace is flat by contract);
	/// symlinks are not followed and fail the scan as unreadable.
	pub async fn scan(&self) -> Result<Vec<FileRecord>, SyncError> {
		let mut records = Vec::new();

		for entry in self.list().await? {
			match entry.kind {
				EntryKind::Dir => continue,
				EntryKind::SymLink => {
					return Err(SyncError::FileUnreadable {
						name: entry.name,
						source: io::Error::new(
							io::ErrorKind::InvalidInput,
							"symbolic links are not followed",
						),
					});
				}
				EntryKind::File => {}
			}

			let content_hash = self.hash_entry(&entry.name).await?;
			records.push(FileRecord {
				name: entry.name,
				content_hash,
				size: entry.size,
				mtime: entry.mtime,
			});
		}

		Ok(records)
	}
}


// vim: ts=4
