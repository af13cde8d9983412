// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire format of the run event stream.
//!
//! Each SSE frame on `GET /run/{id}` carries one JSON object discriminated by
//! `msgType`:
//!
//! - `Heartbeat` - keep-alive, no payload
//! - `Stage` - `stage` and `stageResult`
//! - `Waiting` - `log`, a queue position note
//! - `LogOut` / `LogErr` - `log`, one line of job output
//! - `EndSuccess` / `EndFailure` - terminal, no payload
//!
//! The server serialises every optional field, using `null` when unused, so
//! frames are first read into the flat [`RealTimeMessage`] and then narrowed
//! into the tagged [`WireMessage`].
//!
//! # Example
//!
//! ```
//! use anport_monitor_core::{Stage, StageResult, WireMessage};
//!
//! let frame = r#"{"msgType":"Stage","stage":"CleanRun","stageResult":"Success","log":null}"#;
//! let msg = WireMessage::decode(frame).unwrap();
//! assert_eq!(
//! 	msg,
//! 	WireMessage::Stage {
//! 		stage: Stage::CleanRun,
//! 		result: StageResult::Success,
//! 	}
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MonitorCoreError, Result};
use crate::status::{Stage, StageResult};

/// Discriminator of a stream frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
	Heartbeat,
	Waiting,
	Stage,
	LogOut,
	LogErr,
	EndSuccess,
	EndFailure,
}

impl MessageType {
	pub fn as_str(self) -> &'static str {
		match self {
			MessageType::Heartbeat => "Heartbeat",
			MessageType::Waiting => "Waiting",
			MessageType::Stage => "Stage",
			MessageType::LogOut => "LogOut",
			MessageType::LogErr => "LogErr",
			MessageType::EndSuccess => "EndSuccess",
			MessageType::EndFailure => "EndFailure",
		}
	}
}

/// Flat frame as serialised by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeMessage {
	#[serde(rename = "msgType")]
	pub msg_type: MessageType,
	#[serde(default)]
	pub stage: Option<Stage>,
	#[serde(rename = "stageResult", default)]
	pub stage_result: Option<StageResult>,
	#[serde(default)]
	pub log: Option<String>,
}

impl RealTimeMessage {
	fn bare(msg_type: MessageType) -> Self {
		Self {
			msg_type,
			stage: None,
			stage_result: None,
			log: None,
		}
	}
}

/// A decoded stream frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
	Heartbeat,
	Stage { stage: Stage, result: StageResult },
	Waiting(String),
	LogOut(String),
	LogErr(String),
	EndSuccess,
	EndFailure,
}

impl WireMessage {
	/// Decodes the data payload of one SSE frame.
	pub fn decode(data: &str) -> Result<Self> {
		let raw: RealTimeMessage = serde_json::from_str(data)?;
		Self::try_from(raw)
	}

	/// Serialises the message in the server's flat format.
	pub fn encode(&self) -> Result<String> {
		Ok(serde_json::to_string(&RealTimeMessage::from(self.clone()))?)
	}

	pub fn msg_type(&self) -> MessageType {
		match self {
			WireMessage::Heartbeat => MessageType::Heartbeat,
			WireMessage::Stage { .. } => MessageType::Stage,
			WireMessage::Waiting(_) => MessageType::Waiting,
			WireMessage::LogOut(_) => MessageType::LogOut,
			WireMessage::LogErr(_) => MessageType::LogErr,
			WireMessage::EndSuccess => MessageType::EndSuccess,
			WireMessage::EndFailure => MessageType::EndFailure,
		}
	}

	pub fn is_terminal(&self) -> bool {
		matches!(self, WireMessage::EndSuccess | WireMessage::EndFailure)
	}
}

impl TryFrom<RealTimeMessage> for WireMessage {
	type Error = MonitorCoreError;

	fn try_from(raw: RealTimeMessage) -> Result<Self> {
		let name = raw.msg_type.as_str();
		let log = |raw: RealTimeMessage| raw.log.ok_or(MonitorCoreError::missing_field(name, "log"));

		Ok(match raw.msg_type {
			MessageType::Heartbeat => WireMessage::Heartbeat,
			MessageType::Stage => {
				let stage = raw
					.stage
					.ok_or(MonitorCoreError::missing_field(name, "stage"))?;
				let result = raw
					.stage_result
					.ok_or(MonitorCoreError::missing_field(name, "stageResult"))?;
				WireMessage::Stage { stage, result }
			}
			MessageType::Waiting => WireMessage::Waiting(log(raw)?),
			MessageType::LogOut => WireMessage::LogOut(log(raw)?),
			MessageType::LogErr => WireMessage::LogErr(log(raw)?),
			MessageType::EndSuccess => WireMessage::EndSuccess,
			MessageType::EndFailure => WireMessage::EndFailure,
		})
	}
}

impl From<WireMessage> for RealTimeMessage {
	fn from(msg: WireMessage) -> Self {
		let mut raw = RealTimeMessage::bare(msg.msg_type());
		match msg {
			WireMessage::Stage { stage, result } => {
				raw.stage = Some(stage);
				raw.stage_result = Some(result);
			}
			WireMessage::Waiting(text) | WireMessage::LogOut(text) | WireMessage::LogErr(text) => {
				raw.log = Some(text);
			}
			WireMessage::Heartbeat | WireMessage::EndSuccess | WireMessage::EndFailure => {}
		}
		raw
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_server_frames_with_nulls() {
		let msg =
			WireMessage::decode(r#"{"msgType":"Heartbeat","stage":null,"stageResult":null,"log":null}"#)
				.unwrap();
		assert_eq!(msg, WireMessage::Heartbeat);

		let msg = WireMessage::decode(
			r#"{"msgType":"Waiting","stage":null,"stageResult":null,"log":"Waiting for 4 other analyses to finish"}"#,
		)
		.unwrap();
		assert_eq!(
			msg,
			WireMessage::Waiting("Waiting for 4 other analyses to finish".to_string())
		);
	}

	#[test]
	fn decodes_frames_without_optional_fields() {
		assert_eq!(
			WireMessage::decode(r#"{"msgType":"EndSuccess"}"#).unwrap(),
			WireMessage::EndSuccess
		);
		assert_eq!(
			WireMessage::decode(r#"{"msgType":"LogErr","log":"Error in x"}"#).unwrap(),
			WireMessage::LogErr("Error in x".to_string())
		);
	}

	#[test]
	fn decodes_na_stage_result() {
		let msg =
			WireMessage::decode(r#"{"msgType":"Stage","stage":"OutputFiles","stageResult":"NA"}"#)
				.unwrap();
		assert_eq!(
			msg,
			WireMessage::Stage {
				stage: Stage::OutputFiles,
				result: StageResult::NotApplicable,
			}
		);
	}

	#[test]
	fn ignores_unknown_fields() {
		let msg = WireMessage::decode(r#"{"msgType":"LogOut","log":"1","extra":true}"#).unwrap();
		assert_eq!(msg, WireMessage::LogOut("1".to_string()));
	}

	#[test]
	fn stage_frame_without_result_is_rejected() {
		let err = WireMessage::decode(r#"{"msgType":"Stage","stage":"CleanRun"}"#).unwrap_err();
		assert!(matches!(
			err,
			MonitorCoreError::MissingField {
				msg_type: "Stage",
				field: "stageResult"
			}
		));
	}

	#[test]
	fn log_frame_without_text_is_rejected() {
		let err = WireMessage::decode(r#"{"msgType":"LogOut","log":null}"#).unwrap_err();
		assert!(matches!(err, MonitorCoreError::MissingField { field: "log", .. }));
	}

	#[test]
	fn unknown_msg_type_is_rejected() {
		let err = WireMessage::decode(r#"{"msgType":"Bogus"}"#).unwrap_err();
		assert!(matches!(err, MonitorCoreError::Json(_)));
	}

	#[test]
	fn encode_uses_server_field_names() {
		let json = WireMessage::Stage {
			stage: Stage::ImportInputFiles,
			result: StageResult::Pending,
		}
		.encode()
		.unwrap();
		assert!(json.contains(r#""msgType":"Stage""#));
		assert!(json.contains(r#""stageResult":"Pending""#));
		assert!(json.contains(r#""log":null"#));
	}

	#[test]
	fn terminal_messages() {
		assert!(WireMessage::EndSuccess.is_terminal());
		assert!(WireMessage::EndFailure.is_terminal());
		assert!(!WireMessage::Heartbeat.is_terminal());
		assert!(!WireMessage::LogOut(String::new()).is_terminal());
	}
}
