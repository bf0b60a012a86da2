//! Persistent hash cache for incremental rescans
//!
//! Stores the `(size, mtime, hash)` triple observed for each file at hash
//! time, so a session restarted on the same folder does not rehash files
//! that have not changed. Purely an optimization: a missing or undecodable
//! entry degrades to rehashing, never to a failure.

use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CacheError;
use crate::logging::*;
use crate::manifest::FileRecord;

/// Table of file records
/// Key: filename (flat namespace)
/// Value: serialized FileRecord (bytes)
const FILES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("files");

/// Hash cache backed by a redb database
pub struct ManifestCache {
	db: redb::Database,
}

impl ManifestCache {
	/// Open or create the cache database
	pub fn open(db_path: &Path) -> Result<Self, CacheError> {
		let db = redb::Database::create(db_path)
			.map_err(|e| CacheError::OpenFailed { source: Box::new(e) })?;
		// Ensure the table exists
		{
			let write_txn = db
				.begin_write()
				.map_err(|e| CacheError::OpenFailed { source: Box::new(e) })?;
			let _ = write_txn
				.open_table(FILES_TABLE)
				.map_err(|e| CacheError::OpenFailed { source: Box::new(e) })?;
			write_txn
				.commit()
				.map_err(|e| CacheError::OpenFailed { source: Box::new(e) })?;
		}
		Ok(ManifestCache { db })
	}

	/// Load all cached records, keyed by filename.
	///
	/// Entries that fail to decode are skipped with a warning; the
	/// corresponding files simply get rehashed on the next scan.
	pub fn load(&self) -> Result<BTreeMap<String, FileRecord>, CacheError> {
		let read_txn = self
			.db
			.begin_read()
			.map_err(|e| CacheError::ReadFailed { source: Box::new(e) })?;
		let table = read_txn
			.open_table(FILES_TABLE)
			.map_err(|e| CacheError::ReadFailed { source: Box::new(e) })?;

		let mut records = BTreeMap::new();
		let mut iter = table
			.iter()
			.map_err(|e| CacheError::ReadFailed { source: Box::new(e) })?;
		while let Some(item) = iter.next() {
			let (key, value) =
				item.map_err(|e| CacheError::ReadFailed { source: Box::new(e) })?;
			let name = key.value().to_string();
			match serde_json::from_slice::<FileRecord>(value.value()) {
				Ok(record) => {
					records.insert(name, record);
				}
				Err(e) => {
					warn!(name = %name, error = %e, "skipping undecodable cache entry");
				}
			}
		}

		Ok(records)
	}

	/// Replace the cache wholesale with the records of a committed scan
	pub fn store(&self, records: &[FileRecord]) -> Result<(), CacheError> {
		let write_txn = self
			.db
			.begin_write()
			.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;
		{
			let mut table = write_txn
				.open_table(FILES_TABLE)
				.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;

			// Drop names that disappeared since the last scan
			let mut stale = Vec::new();
			{
				let mut iter = table
					.iter()
					.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;
				while let Some(item) = iter.next() {
					let (key, _) =
						item.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;
					stale.push(key.value().to_string());
				}
			}
			for name in stale {
				table
					.remove(name.as_str())
					.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;
			}

			for record in records {
				let bytes = serde_json::to_vec(record)
					.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;
				table
					.insert(record.name.as_str(), bytes.as_slice())
					.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;
			}
		}
		write_txn
			.commit()
			.map_err(|e| CacheError::WriteFailed { source: Box::new(e) })?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	const H1: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
	const H2: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

	fn record(name: &str, hash: &str, size: u64, mtime: i64) -> FileRecord {
		FileRecord {
			name: name.to_string(),
			content_hash: hash.to_string(),
			size,
			mtime,
		}
	}

	#[test]
	fn test_store_and_load() {
		let tmp = TempDir::new().unwrap();
		let cache = ManifestCache::open(&tmp.path().join("cache.redb")).unwrap();

		cache
			.store(&[record("a.jpg", H1, 5, 100), record("b.jpg", H2, 9, 200)])
			.unwrap();

		let records = cache.load().unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records["a.jpg"].content_hash, H1);
		assert_eq!(records["b.jpg"].size, 9);
		assert_eq!(records["b.jpg"].mtime, 200);
	}

	#[test]
	fn test_store_replaces_wholesale() {
		let tmp = TempDir::new().unwrap();
		let cache = ManifestCache::open(&tmp.path().join("cache.redb")).unwrap();

		cache
			.store(&[record("a.jpg", H1, 5, 100), record("b.jpg", H2, 9, 200)])
			.unwrap();
		// Second scan no longer contains b.jpg
		cache.store(&[record("a.jpg", H1, 5, 100)]).unwrap();

		let records = cache.load().unwrap();
		assert_eq!(records.len(), 1);
		assert!(records.contains_key("a.jpg"));
	}

	#[test]
	fn test_load_empty_cache() {
		let tmp = TempDir::new().unwrap();
		let cache = ManifestCache::open(&tmp.path().join("cache.redb")).unwrap();
		assert!(cache.load().unwrap().is_empty());
	}

	#[test]
	fn test_survives_reopen() {
		let tmp = TempDir::new().unwrap();
		let db_path = tmp.path().join("cache.redb");
		{
			let cache = ManifestCache::open(&db_path).unwrap();
			cache.store(&[record("a.jpg", H1, 5, 100)]).unwrap();
		}
		let cache = ManifestCache::open(&db_path).unwrap();
		let records = cache.load().unwrap();
		assert_eq!(records["a.jpg"].content_hash, H1);
	}
}

// vim: ts=4
