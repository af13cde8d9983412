// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Connection settings shared by the stream client and the portal client.

use std::time::Duration;

use anport_common_http::SessionToken;
use url::Url;

use crate::error::{MonitorError, Result};
use crate::ticker::DEFAULT_RENDER_INTERVAL;

/// Configuration for reaching the portal API.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
	/// API root, e.g. `https://portal.example.org/api/`. Always ends in `/`.
	base_url: Url,
	/// Sent as the `session_id` cookie on every request.
	pub session_token: Option<SessionToken>,
	/// Period of the render ticker.
	pub render_interval: Duration,
	/// Connect timeout for the run stream.
	pub connect_timeout: Duration,
	/// Overall timeout for request/response calls.
	pub request_timeout: Duration,
}

impl MonitorConfig {
	pub fn new(base_url: &str) -> Result<Self> {
		let mut base_url = Url::parse(base_url)?;
		if base_url.cannot_be_a_base() {
			return Err(MonitorError::InvalidUrl(
				url::ParseError::RelativeUrlWithCannotBeABaseBase,
			));
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());
			base_url.set_path(&path);
		}
		Ok(Self {
			base_url,
			session_token: None,
			render_interval: DEFAULT_RENDER_INTERVAL,
			connect_timeout: Duration::from_secs(10),
			request_timeout: Duration::from_secs(30),
		})
	}

	pub fn with_session_token(mut self, token: SessionToken) -> Self {
		self.session_token = Some(token);
		self
	}

	pub fn with_render_interval(mut self, interval: Duration) -> Self {
		self.render_interval = interval;
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Builds `{base}/{segments...}`, percent-encoding each segment.
	pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.base_url.clone();
		url
			.path_segments_mut()
			.map_err(|_| MonitorError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	/// The run stream endpoint for `job_id`.
	pub fn run_url(&self, job_id: &str) -> Result<Url> {
		self.endpoint(&["run", job_id])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_url_gains_trailing_slash() {
		let config = MonitorConfig::new("http://localhost:9000/api").unwrap();
		assert_eq!(config.base_url().as_str(), "http://localhost:9000/api/");
	}

	#[test]
	fn run_url_is_job_scoped() {
		let config = MonitorConfig::new("http://localhost:9000/api").unwrap();
		assert_eq!(
			config.run_url("abc-123").unwrap().as_str(),
			"http://localhost:9000/api/run/abc-123"
		);
	}

	#[test]
	fn job_id_is_percent_encoded() {
		let config = MonitorConfig::new("http://localhost:9000/api/").unwrap();
		assert_eq!(
			config.run_url("a/b c").unwrap().as_str(),
			"http://localhost:9000/api/run/a%2Fb%20c"
		);
	}

	#[test]
	fn rejects_non_base_urls() {
		assert!(MonitorConfig::new("mailto:someone@example.org").is_err());
		assert!(MonitorConfig::new("not a url").is_err());
	}

	#[test]
	fn defaults() {
		let config = MonitorConfig::new("http://localhost/").unwrap();
		assert_eq!(config.render_interval, Duration::from_millis(500));
		assert!(config.session_token.is_none());
	}
}
