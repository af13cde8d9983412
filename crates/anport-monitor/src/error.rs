// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the run monitor.

use thiserror::Error;

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors surfaced by the monitor's request/response calls.
///
/// Failures of an open run stream are not reported through this type; they
/// end the attempt and are visible in its status and log.
#[derive(Debug, Error)]
pub enum MonitorError {
	#[error("connection failed: {0}")]
	ConnectionFailed(#[from] reqwest::Error),

	#[error("server returned {status}: {message}")]
	ServerError { status: u16, message: String },

	#[error("event stream error: {0}")]
	SseStreamError(String),

	#[error("invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("analysis {id} is not ready to run: {reason}")]
	NotReady { id: String, reason: String },
}
