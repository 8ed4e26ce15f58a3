//! Converter configuration.
//!
//! ```toml
//! settings-path = "converters/settings.xml"
//! converters-dir = "converters"
//! canonical-root = "{urn:example:v3}Model"
//! ```
//!
//! Relative paths in a file loaded with [`ConverterConfig::load`] are taken
//! relative to that file's directory.

use std::path::{Path, PathBuf};

use ladder_intern::{ElementName, InternError, NameTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("invalid canonical root: {0}")]
	CanonicalRoot(#[from] InternError),
}

/// Where converter settings live and which root element is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConverterConfig {
	/// The settings document listing every converter.
	pub settings_path: PathBuf,
	/// Base directory for `transformFile` paths.
	pub converters_dir: PathBuf,
	/// Root element of the current format, in `{namespace}local` notation.
	pub canonical_root: String,
}

impl ConverterConfig {
	pub fn new(settings_path: impl Into<PathBuf>, converters_dir: impl Into<PathBuf>, canonical_root: impl Into<String>) -> Self {
		Self {
			settings_path: settings_path.into(),
			converters_dir: converters_dir.into(),
			canonical_root: canonical_root.into(),
		}
	}

	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a TOML config file, resolving relative paths against its directory.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let mut config = Self::from_toml_str(&text)?;
		if let Some(base) = path.parent() {
			config.settings_path = base.join(&config.settings_path);
			config.converters_dir = base.join(&config.converters_dir);
		}
		Ok(config)
	}

	/// Parses [`ConverterConfig::canonical_root`] into `names`.
	pub fn canonical_root(&self, names: &NameTable) -> Result<ElementName, InternError> {
		ElementName::from_clark(names, &self.canonical_root)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		ElementName::from_clark(&NameTable::new(), &self.canonical_root)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_kebab_case_keys() {
		let config = ConverterConfig::from_toml_str(
			r#"
			settings-path = "settings.xml"
			converters-dir = "conv"
			canonical-root = "{urn:v3}Model"
			"#,
		)
		.unwrap();
		assert_eq!(config, ConverterConfig::new("settings.xml", "conv", "{urn:v3}Model"));
	}

	#[test]
	fn rejects_unknown_keys_and_bad_roots() {
		let unknown = ConverterConfig::from_toml_str(
			r#"
			settings-path = "s.xml"
			converters-dir = "c"
			canonical-root = "Model"
			extra = 1
			"#,
		);
		assert!(matches!(unknown, Err(ConfigError::Toml(_))));

		let bad_root = ConverterConfig::from_toml_str(
			r#"
			settings-path = "s.xml"
			converters-dir = "c"
			canonical-root = "{urn:v3"
			"#,
		);
		assert!(matches!(bad_root, Err(ConfigError::CanonicalRoot(_))));
	}

	#[test]
	fn load_resolves_relative_paths() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ladder.toml");
		std::fs::write(
			&path,
			"settings-path = \"settings.xml\"\nconverters-dir = \"/abs/conv\"\ncanonical-root = \"Model\"\n",
		)
		.unwrap();

		let config = ConverterConfig::load(&path).unwrap();
		assert_eq!(config.settings_path, dir.path().join("settings.xml"));
		assert_eq!(config.converters_dir, PathBuf::from("/abs/conv"));
	}

	#[test]
	fn missing_file_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = ConverterConfig::load(&dir.path().join("absent.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
