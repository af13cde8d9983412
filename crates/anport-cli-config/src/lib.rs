// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for the analysis portal CLI.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from multiple sources
//! - TOML configuration file parsing
//! - Environment variable overrides (`ANPORT_*`)
//! - Conversion into the monitor's [`MonitorConfig`](anport_monitor::MonitorConfig)

pub mod error;
pub mod layer;
pub mod paths;
pub mod runtime;
pub mod sources;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::{resolve_xdg_paths, PathsConfig};
pub use runtime::AnportConfig;
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, FileSource, Precedence,
};

use tracing::{debug, info};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:9000/api";
pub const DEFAULT_RENDER_INTERVAL_MS: u64 = 500;
pub const DEFAULT_SCROLL_MARGIN: usize = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Load configuration from all sources with default precedence.
pub fn load_config() -> Result<AnportConfig, ConfigError> {
	load_config_with_cli(CliOverrides::default())
}

/// Load configuration with CLI overrides.
///
/// Precedence (highest to lowest):
/// 1. CLI flags
/// 2. Environment variables (`ANPORT_*`)
/// 3. User config file (`$XDG_CONFIG_HOME/anport/config.toml`, or `--config`)
/// 4. System config file (`/etc/anport/config.toml`)
/// 5. Built-in defaults
pub fn load_config_with_cli(cli: CliOverrides) -> Result<AnportConfig, ConfigError> {
	let paths = resolve_xdg_paths()?;

	let user_file = match &cli.config_file {
		Some(path) => FileSource::new(path, Precedence::UserFile),
		None => FileSource::user(&paths),
	};

	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(FileSource::system(&paths)),
		Box::new(user_file),
		Box::new(EnvSource::new()),
		Box::new(CliSource::new(cli)),
	];

	load_from_sources(sources, paths)
}

/// Merges `sources` in precedence order and resolves the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
	paths: PathsConfig,
) -> Result<AnportConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = AnportConfig::from_layer(merged, paths)?;
	info!(
		server_url = %config.server_url,
		session = config.session_token.is_some(),
		render_interval_ms = config.render_interval.as_millis() as u64,
		"configuration loaded"
	);
	Ok(config)
}
