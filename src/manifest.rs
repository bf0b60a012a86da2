//! Manifest types: content-hash fingerprints of a shared folder
//!
//! A `Manifest` maps each filename to the lowercase-hex SHA-256 digest of
//! the file's full byte content. It represents one folder's (or one peer's)
//! content state at a single instant and is immutable once produced; a
//! fresh scan or a fresh remote document replaces it wholesale.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::SyncError;

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Check that a digest is exactly 64 lowercase hex characters
pub fn validate_digest(digest: &str) -> Result<(), SyncError> {
	if digest.len() != DIGEST_HEX_LEN {
		return Err(SyncError::MalformedManifest {
			reason: format!(
				"digest must be {} hex characters, got {}",
				DIGEST_HEX_LEN,
				digest.len()
			),
		});
	}
	if !digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
		return Err(SyncError::MalformedManifest {
			reason: format!("digest is not lowercase hex: '{}'", digest),
		});
	}
	Ok(())
}

/// Metadata observed for one file at hash time
///
/// `name` is the sync-relevant identity (flat namespace, no path nesting).
/// `size` and `mtime` are kept so a later rescan can reuse the hash when
/// both are unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
	pub name: String,

	/// Lowercase-hex SHA-256 digest of the full file content
	#[serde(rename = "hash")]
	pub content_hash: String,

	#[serde(rename = "sz")]
	pub size: u64,

	/// Modification time, nanoseconds since the Unix epoch
	#[serde(rename = "mt")]
	pub mtime: i64,
}

/// Snapshot of a folder's (or peer's) content state: filename to digest
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
	entries: BTreeMap<String, String>,
}

impl Manifest {
	/// Empty manifest (an empty folder, distinct from a failed scan)
	pub fn new() -> Self {
		Manifest { entries: BTreeMap::new() }
	}

	/// Build from name/digest pairs, validating digests and rejecting
	/// duplicate names
	pub fn from_entries<I, N, D>(entries: I) -> Result<Self, SyncError>
	where
		I: IntoIterator<Item = (N, D)>,
		N: Into<String>,
		D: Into<String>,
	{
		let mut manifest = Manifest::new();
		for (name, digest) in entries {
			let name = name.into();
			let digest = digest.into();
			validate_digest(&digest)?;
			if manifest.entries.insert(name.clone(), digest).is_some() {
				return Err(SyncError::MalformedManifest {
					reason: format!("duplicate entry '{}'", name),
				});
			}
		}
		Ok(manifest)
	}

	/// Build from scan records; digests from our own hasher are valid by
	/// construction and names are unique within one folder listing
	pub fn from_records<'a, I>(records: I) -> Self
	where
		I: IntoIterator<Item = &'a FileRecord>,
	{
		let entries = records
			.into_iter()
			.map(|r| (r.name.clone(), r.content_hash.clone()))
			.collect();
		Manifest { entries }
	}

	/// Parse a remote manifest document (flat JSON object of
	/// filename to digest). Malformed digests and duplicate keys are
	/// rejected here, before the diff engine ever sees the manifest.
	pub fn from_json_str(s: &str) -> Result<Self, SyncError> {
		serde_json::from_str(s)
			.map_err(|e| SyncError::MalformedManifest { reason: e.to_string() })
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries.get(name).map(|s| s.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate (name, digest) pairs in name order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(n, d)| (n.as_str(), d.as_str()))
	}
}

impl Serialize for Manifest {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (name, digest) in &self.entries {
			map.serialize_entry(name, digest)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Manifest {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct ManifestVisitor;

		impl<'de> Visitor<'de> for ManifestVisitor {
			type Value = Manifest;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "a map of filename to 64-character lowercase hex digest")
			}

			fn visit_map<A>(self, mut map: A) -> Result<Manifest, A::Error>
			where
				A: MapAccess<'de>,
			{
				let mut entries = BTreeMap::new();
				// The deserializer hands over every key/value pair of the
				// document, so textual duplicates are observable here
				while let Some((name, digest)) = map.next_entry::<String, String>()? {
					match validate_digest(&digest) {
						Ok(()) => {}
						Err(SyncError::MalformedManifest { reason }) => {
							return Err(de::Error::custom(format!("entry '{}': {}", name, reason)));
						}
						Err(e) => return Err(de::Error::custom(e.to_string())),
					}
					if entries.insert(name.clone(), digest).is_some() {
						return Err(de::Error::custom(format!("duplicate entry '{}'", name)));
					}
				}
				Ok(Manifest { entries })
			}
		}

		deserializer.deserialize_map(ManifestVisitor)
	}
}

/// Classification of one filename after comparing two manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCondition {
	/// Present in the remote manifest, absent locally: should be fetched
	Missing,

	/// Present locally, absent in the remote manifest: should be offered
	Additional,

	/// Present on both sides with differing content hashes
	Conflicting,
}

/// Filename to classification; names identical on both sides are absent
pub type DiffResult = BTreeMap<String, FileCondition>;


// vim: ts=4
