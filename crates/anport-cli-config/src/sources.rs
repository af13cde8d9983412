// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files, environment, CLI flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;

pub const ENV_SERVER_URL: &str = "ANPORT_SERVER_URL";
pub const ENV_SESSION_TOKEN: &str = "ANPORT_SESSION_TOKEN";
pub const ENV_RENDER_INTERVAL_MS: &str = "ANPORT_RENDER_INTERVAL_MS";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	SystemFile = 20,
	UserFile = 30,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(ConfigLayer {
			server_url: Some(crate::DEFAULT_SERVER_URL.to_string()),
			session_token: None,
			render_interval_ms: Some(crate::DEFAULT_RENDER_INTERVAL_MS),
			scroll_margin: Some(crate::DEFAULT_SCROLL_MARGIN),
			request_timeout_secs: Some(crate::DEFAULT_REQUEST_TIMEOUT_SECS),
			log_level: Some(crate::DEFAULT_LOG_LEVEL.to_string()),
		})
	}
}

/// TOML file source. A missing file contributes nothing.
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
}

impl FileSource {
	pub fn new(path: impl Into<PathBuf>, precedence: Precedence) -> Self {
		Self {
			path: path.into(),
			precedence,
		}
	}

	pub fn system(paths: &PathsConfig) -> Self {
		Self::new(&paths.system_config_file, Precedence::SystemFile)
	}

	pub fn user(paths: &PathsConfig) -> Self {
		Self::new(&paths.user_config_file, Precedence::UserFile)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		match self.precedence {
			Precedence::SystemFile => "system-config",
			_ => "user-config",
		}
	}

	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source (`ANPORT_*`).
#[derive(Default)]
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads from a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		let value = match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn var_u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		match self.var(name) {
			Some(v) => v
				.parse()
				.map(Some)
				.map_err(|_| ConfigError::invalid_value(name, format!("invalid integer '{v}'"))),
			None => Ok(None),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ConfigLayer {
			server_url: self.var(ENV_SERVER_URL),
			session_token: self.var(ENV_SESSION_TOKEN),
			render_interval_ms: self.var_u64(ENV_RENDER_INTERVAL_MS)?,
			..Default::default()
		})
	}
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub server_url: Option<String>,
	pub session_token: Option<String>,
	pub render_interval_ms: Option<u64>,
	pub scroll_margin: Option<usize>,
	pub log_level: Option<String>,
	/// Replaces the user config file.
	pub config_file: Option<PathBuf>,
}

pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		let cli = &self.overrides;
		Ok(ConfigLayer {
			server_url: cli.server_url.clone(),
			session_token: cli.session_token.clone(),
			render_interval_ms: cli.render_interval_ms,
			scroll_margin: cli.scroll_margin,
			request_timeout_secs: None,
			log_level: cli.log_level.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn missing_file_is_empty_layer() {
		let dir = tempfile::tempdir().unwrap();
		let source = FileSource::new(dir.path().join("nope.toml"), Precedence::UserFile);
		assert_eq!(source.load().unwrap(), ConfigLayer::default());
	}

	#[test]
	fn loads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "session_token = \"abc\"\nrequest_timeout_secs = 5").unwrap();
		let layer = FileSource::new(file.path(), Precedence::UserFile)
			.load()
			.unwrap();
		assert_eq!(layer.session_token.as_deref(), Some("abc"));
		assert_eq!(layer.request_timeout_secs, Some(5));
	}

	#[test]
	fn malformed_file_reports_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "render_interval_ms = \"fast\"").unwrap();
		let err = FileSource::new(file.path(), Precedence::UserFile)
			.load()
			.unwrap_err();
		match err {
			ConfigError::TomlParse { path, .. } => assert_eq!(path, file.path()),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn env_reads_known_variables() {
		let layer = EnvSource::from_vars([
			(ENV_SERVER_URL, "https://portal.example.org/api"),
			(ENV_SESSION_TOKEN, "tok"),
			(ENV_RENDER_INTERVAL_MS, "250"),
		])
		.load()
		.unwrap();
		assert_eq!(
			layer.server_url.as_deref(),
			Some("https://portal.example.org/api")
		);
		assert_eq!(layer.session_token.as_deref(), Some("tok"));
		assert_eq!(layer.render_interval_ms, Some(250));
	}

	#[test]
	fn env_empty_values_are_unset() {
		let layer = EnvSource::from_vars([(ENV_SERVER_URL, "")]).load().unwrap();
		assert_eq!(layer.server_url, None);
	}

	#[test]
	fn env_rejects_non_numeric_interval() {
		let err = EnvSource::from_vars([(ENV_RENDER_INTERVAL_MS, "soon")])
			.load()
			.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::InvalidValue { ref field, .. } if field == ENV_RENDER_INTERVAL_MS
		));
	}

	#[test]
	fn precedence_order() {
		assert!(Precedence::Defaults < Precedence::SystemFile);
		assert!(Precedence::SystemFile < Precedence::UserFile);
		assert!(Precedence::UserFile < Precedence::Environment);
		assert!(Precedence::Environment < Precedence::Cli);
	}
}
