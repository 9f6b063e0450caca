//! Session configuration.
//!
//! ```toml
//! layer = "CUSTOMER"
//! history-limit = 200
//! plugins = ["rename", "drag-drop", "control-variant"]
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use rta_registry::Layer;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::ConfigError;
use crate::plugin::PluginKind;

/// Settings for one [`AuthoringSession`](crate::AuthoringSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AuthoringConfig {
	/// Layer changes are recorded in and change handlers are looked up for.
	pub layer: Layer,
	/// Maximum number of commands kept in history. Unbounded when unset.
	pub history_limit: Option<NonZeroUsize>,
	/// Plugins run by the session, in evaluation order.
	pub plugins: Vec<PluginKind>,
}

impl Default for AuthoringConfig {
	fn default() -> Self {
		Self {
			layer: Layer::default(),
			history_limit: None,
			plugins: PluginKind::iter().collect(),
		}
	}
}

impl AuthoringConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let mut config: Self = toml::from_str(input)?;
		config.dedup_plugins();
		Ok(config)
	}

	/// Reads and parses a config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&content)
	}

	/// Keeps the first occurrence of each plugin.
	fn dedup_plugins(&mut self) {
		let mut seen = Vec::with_capacity(self.plugins.len());
		self.plugins.retain(|p| {
			if seen.contains(p) {
				return false;
			}
			seen.push(*p);
			true
		});
	}
}
