//! Pure manifest comparison
//!
//! Classification depends only on the two input mappings, never on
//! enumeration order or time. O(|local| + |remote|) via map lookups.

use crate::manifest::{DiffResult, FileCondition, Manifest};

/// Classify every filename across a local and a remote manifest.
///
/// Names present only in `local` are `Additional` (offer to the peer),
/// names present only in `remote` are `Missing` (fetch from the peer),
/// and names present on both sides with differing digests are
/// `Conflicting`. Names with identical digests on both sides are omitted.
pub fn diff(local: &Manifest, remote: &Manifest) -> DiffResult {
	let mut result = DiffResult::new();

	for (name, digest) in local.iter() {
		match remote.get(name) {
			None => {
				result.insert(name.to_string(), FileCondition::Additional);
			}
			Some(remote_digest) if remote_digest != digest => {
				result.insert(name.to_string(), FileCondition::Conflicting);
			}
			Some(_) => {}
		}
	}

	for (name, _) in remote.iter() {
		if !local.contains(name) {
			result.insert(name.to_string(), FileCondition::Missing);
		}
	}

	result
}


// vim: ts=4
