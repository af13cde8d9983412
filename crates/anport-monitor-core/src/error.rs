// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for decoding run stream frames.

use thiserror::Error;

/// Result type for monitor core operations.
pub type Result<T> = std::result::Result<T, MonitorCoreError>;

/// Errors that can occur while decoding a stream frame.
#[derive(Debug, Error)]
pub enum MonitorCoreError {
	#[error("invalid frame JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("{msg_type} frame is missing field `{field}`")]
	MissingField {
		msg_type: &'static str,
		field: &'static str,
	},
}

impl MonitorCoreError {
	pub fn missing_field(msg_type: &'static str, field: &'static str) -> Self {
		Self::MissingField { msg_type, field }
	}
}
