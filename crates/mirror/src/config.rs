//! Mirror configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! snapshot_ttl_ms = 100
//! debounce_ms = 30
//! history_capacity = 8
//! root_depth = 0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use umbra_primitives::StorePolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or field types.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A field parsed but its value is unusable.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Largest accepted `root_depth` magnitude.
pub const MAX_ROOT_DEPTH: i32 = i32::MAX / 2;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
	/// How long a committed snapshot counts as fresh, in milliseconds.
	pub snapshot_ttl_ms: u64,
	/// Quiet period before a scheduled recompute fires, in milliseconds.
	pub debounce_ms: u64,
	/// Previous snapshots kept per node.
	pub history_capacity: usize,
	/// Depth assigned to roots.
	pub root_depth: i32,
}

impl Default for MirrorConfig {
	fn default() -> Self {
		Self {
			snapshot_ttl_ms: 100,
			debounce_ms: 30,
			history_capacity: 8,
			root_depth: 0,
		}
	}
}

impl MirrorConfig {
	pub fn snapshot_ttl(&self) -> Duration {
		Duration::from_millis(self.snapshot_ttl_ms)
	}

	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses, and validates a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&source)?;
		tracing::debug!(path = ?path, ?config, "mirror.config.loaded");
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if self.history_capacity == 0 {
			return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
		}
		if self.root_depth.unsigned_abs() > MAX_ROOT_DEPTH.unsigned_abs() {
			return Err(ConfigError::Invalid(format!(
				"root_depth must be within ±{MAX_ROOT_DEPTH}, got {}",
				self.root_depth
			)));
		}
		Ok(())
	}

	pub(crate) fn store_policy(&self) -> StorePolicy {
		StorePolicy {
			ttl: self.snapshot_ttl(),
			debounce: self.debounce(),
			history_capacity: self.history_capacity,
		}
	}
}
