// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fully resolved configuration.

use std::time::Duration;

use anport_common_http::SessionToken;
use anport_monitor::MonitorConfig;

use crate::error::ConfigError;
use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone)]
pub struct AnportConfig {
	pub server_url: String,
	pub session_token: Option<SessionToken>,
	pub render_interval: Duration,
	pub scroll_margin: usize,
	pub request_timeout: Duration,
	pub log_level: String,
	pub paths: PathsConfig,
}

impl AnportConfig {
	/// Resolves a merged layer, validating every field.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		let server_url = layer
			.server_url
			.unwrap_or_else(|| crate::DEFAULT_SERVER_URL.to_string());
		MonitorConfig::new(&server_url)
			.map_err(|e| ConfigError::invalid_value("server_url", e.to_string()))?;

		let render_interval_ms = layer
			.render_interval_ms
			.unwrap_or(crate::DEFAULT_RENDER_INTERVAL_MS);
		if render_interval_ms == 0 {
			return Err(ConfigError::invalid_value(
				"render_interval_ms",
				"must be greater than zero",
			));
		}

		let request_timeout_secs = layer
			.request_timeout_secs
			.unwrap_or(crate::DEFAULT_REQUEST_TIMEOUT_SECS);
		if request_timeout_secs == 0 {
			return Err(ConfigError::invalid_value(
				"request_timeout_secs",
				"must be greater than zero",
			));
		}

		let log_level = layer
			.log_level
			.unwrap_or_else(|| crate::DEFAULT_LOG_LEVEL.to_string())
			.to_ascii_lowercase();
		if !LOG_LEVELS.contains(&log_level.as_str()) {
			return Err(ConfigError::invalid_value(
				"log_level",
				format!("expected one of {}", LOG_LEVELS.join(", ")),
			));
		}

		Ok(Self {
			server_url,
			session_token: layer
				.session_token
				.filter(|t| !t.is_empty())
				.map(SessionToken::new),
			render_interval: Duration::from_millis(render_interval_ms),
			scroll_margin: layer.scroll_margin.unwrap_or(crate::DEFAULT_SCROLL_MARGIN),
			request_timeout: Duration::from_secs(request_timeout_secs),
			log_level,
			paths,
		})
	}

	/// Settings for the stream and portal clients.
	pub fn monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
		let mut config = MonitorConfig::new(&self.server_url)
			.map_err(|e| ConfigError::invalid_value("server_url", e.to_string()))?
			.with_render_interval(self.render_interval)
			.with_request_timeout(self.request_timeout);
		if let Some(token) = &self.session_token {
			config = config.with_session_token(token.clone());
		}
		Ok(config)
	}
}
