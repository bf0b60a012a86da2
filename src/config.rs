//! Session configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SyncError;

/// Default debounce window for filesystem-triggered rescans
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Options controlling one sync session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
	/// Directory for persistent state (hash cache database)
	pub state_dir: Option<PathBuf>,

	/// Persist the hash cache across restarts (requires state_dir)
	pub persist_cache: bool,

	/// Profile name isolating cache databases per folder
	pub profile: String,

	/// Debounce window for filesystem-triggered rescans, milliseconds
	pub debounce_ms: u64,
}

impl Default for SessionOptions {
	fn default() -> Self {
		SessionOptions {
			state_dir: None,
			persist_cache: false,
			profile: "default".to_string(),
			debounce_ms: DEFAULT_DEBOUNCE_MS,
		}
	}
}

impl SessionOptions {
	/// Load options from a json5 config file
	pub fn load(path: &Path) -> Result<Self, SyncError> {
		let contents = std::fs::read_to_string(path)?;
		let options: SessionOptions = json5::from_str(&contents).map_err(|e| {
			SyncError::InvalidConfig {
				message: format!("cannot parse {}: {}", path.display(), e),
			}
		})?;
		options.validate()?;
		Ok(options)
	}

	/// Reject inconsistent option combinations
	pub fn validate(&self) -> Result<(), SyncError> {
		if self.persist_cache && self.state_dir.is_none() {
			return Err(SyncError::InvalidConfig {
				message: "persistCache requires stateDir".to_string(),
			});
		}
		if self.profile.is_empty() {
			return Err(SyncError::InvalidConfig {
				message: "profile must not be empty".to_string(),
			});
		}
		Ok(())
	}

	/// Path of the cache database for this profile, if persistence is on
	pub fn cache_db_path(&self) -> Option<PathBuf> {
		if !self.persist_cache {
			return None;
		}
		self.state_dir
			.as_ref()
			.map(|dir| dir.join(format!("{}.cache.redb", self.profile)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::TempDir;

	#[test]
	fn test_defaults() {
		let options = SessionOptions::default();
		assert!(options.state_dir.is_none());
		assert!(!options.persist_cache);
		assert_eq!(options.profile, "default");
		assert_eq!(options.debounce_ms, DEFAULT_DEBOUNCE_MS);
		assert!(options.validate().is_ok());
		assert!(options.cache_db_path().is_none());
	}

	#[test]
	fn test_persist_without_state_dir_rejected() {
		let options = SessionOptions { persist_cache: true, ..Default::default() };
		assert!(matches!(options.validate(), Err(SyncError::InvalidConfig { .. })));
	}

	#[test]
	fn test_cache_db_path_uses_profile() {
		let options = SessionOptions {
			state_dir: Some(PathBuf::from("/var/lib/clipsync")),
			persist_cache: true,
			profile: "living-room".to_string(),
			..Default::default()
		};
		assert_eq!(
			options.cache_db_path(),
			Some(PathBuf::from("/var/lib/clipsync/living-room.cache.redb"))
		);
	}

	#[test]
	fn test_load_json5_file() {
		let tmp = TempDir::new().unwrap();
		let config_path = tmp.path().join("config.json5");
		let mut file = std::fs::File::create(&config_path).unwrap();
		// json5 allows comments and unquoted keys
		write!(
			file,
			"{{\n\t// cache goes next to the config\n\tstateDir: {:?},\n\tpersistCache: true,\n\tprofile: 'media',\n}}",
			tmp.path().to_str().unwrap()
		)
		.unwrap();

		let options = SessionOptions::load(&config_path).unwrap();
		assert!(options.persist_cache);
		assert_eq!(options.profile, "media");
		assert_eq!(options.debounce_ms, DEFAULT_DEBOUNCE_MS);
	}

	#[test]
	fn test_load_rejects_bad_file() {
		let tmp = TempDir::new().unwrap();
		let config_path = tmp.path().join("config.json5");
		std::fs::write(&config_path, "{ not valid").unwrap();
		assert!(matches!(
			SessionOptions::load(&config_path),
			Err(SyncError::InvalidConfig { .. })
		));
	}
}

// vim: ts=4
