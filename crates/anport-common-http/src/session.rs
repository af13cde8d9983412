// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Session credentials for portal requests.
//!
//! The portal authenticates every request, including the run stream, with a
//! `session_id` cookie. [`SessionToken`] keeps the value out of `Debug` output
//! and logs.

use std::fmt;

use reqwest::header::COOKIE;
use reqwest::RequestBuilder;

pub const SESSION_COOKIE: &str = "session_id";

const REDACTED: &str = "[REDACTED]";

#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Do not log the result.
	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn cookie_header(&self) -> String {
		format!("{SESSION_COOKIE}={}", self.0)
	}
}

impl fmt::Debug for SessionToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SessionToken").field(&REDACTED).finish()
	}
}

impl fmt::Display for SessionToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

/// Attaches the session cookie to `request` when a token is configured.
pub fn with_session(request: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
	match token {
		Some(token) => request.header(COOKIE, token.cookie_header()),
		None => {
			tracing::debug!("no session token configured, sending unauthenticated request");
			request
		}
	}
}
