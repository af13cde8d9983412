// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as read from a single source.

use serde::{Deserialize, Serialize};

/// One source's view of the configuration. `None` means "not set here".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
	pub server_url: Option<String>,
	pub session_token: Option<String>,
	pub render_interval_ms: Option<u64>,
	pub scroll_margin: Option<usize>,
	pub request_timeout_secs: Option<u64>,
	pub log_level: Option<String>,
}

impl ConfigLayer {
	/// Overlays `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		if other.server_url.is_some() {
			self.server_url = other.server_url;
		}
		if other.session_token.is_some() {
			self.session_token = other.session_token;
		}
		if other.render_interval_ms.is_some() {
			self.render_interval_ms = other.render_interval_ms;
		}
		if other.scroll_margin.is_some() {
			self.scroll_margin = other.scroll_margin;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
		if other.log_level.is_some() {
			self.log_level = other.log_level;
		}
	}
}
