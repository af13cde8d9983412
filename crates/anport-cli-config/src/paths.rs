// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::PathBuf;

use crate::ConfigError;

const APP_DIR: &str = "anport";
const LOG_FILE: &str = "anport.log";

/// Resolved XDG paths for the portal CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
	/// User config file: ~/.config/anport/config.toml
	pub user_config_file: PathBuf,
	/// System config file: /etc/anport/config.toml
	pub system_config_file: PathBuf,
	/// State directory: ~/.local/state/anport/
	pub state_dir: PathBuf,
}

impl PathsConfig {
	/// Where the TUI writes its tracing output.
	pub fn log_file(&self) -> PathBuf {
		self.state_dir.join(LOG_FILE)
	}
}

/// Resolve XDG paths according to the Base Directory Specification.
///
/// Uses `XDG_CONFIG_HOME` and `XDG_STATE_HOME` if set, otherwise
/// `~/.config` and `~/.local/state`.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
	Ok(paths_from(
		home,
		std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
		std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
	))
}

fn paths_from(
	home: PathBuf,
	config_home: Option<PathBuf>,
	state_home: Option<PathBuf>,
) -> PathsConfig {
	let config_home = config_home.unwrap_or_else(|| home.join(".config"));
	let state_home = state_home.unwrap_or_else(|| home.join(".local/state"));

	tracing::debug!(
		config_home = %config_home.display(),
		state_home = %state_home.display(),
		"resolved XDG paths"
	);

	PathsConfig {
		user_config_file: config_home.join(APP_DIR).join("config.toml"),
		system_config_file: PathBuf::from("/etc").join(APP_DIR).join("config.toml"),
		state_dir: state_home.join(APP_DIR),
	}
}
