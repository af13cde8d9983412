// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message dispatch for one run attempt.
//!
//! [`RunMonitor`] owns the [`AnalysisStatus`] and [`LogStore`] of the current
//! attempt and is the only thing that mutates them. It has one handler per
//! [`WireMessage`] kind plus handlers for the two locally observed endings
//! (user stop and transport error). All three ways an attempt can end share a
//! single finalize-once guard, [`Phase`], which is tracked here rather than
//! inferred from the transport: a user stop finalizes before the transport has
//! noticed anything.
//!
//! The monitor performs no I/O. Handlers that finalize the attempt return
//! [`Dispatch::Finalized`] so the owner of the connection knows to close it,
//! and queue [`UiSignal`]s for the surrounding UI.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::log::{Category, LogEntry, LogStore};
use crate::status::{AnalysisStatus, RunStatus, Stage, StageResult};
use crate::wire::WireMessage;

pub const NOTE_QUEUED: &str = "Queued analysis";
pub const NOTE_STARTED_SCRIPT: &str = "Started script";
pub const NOTE_FINISHED_SCRIPT: &str = "Finished script";
pub const NOTE_STOPPED: &str = "Stopped by user";
pub const NOTE_CLOSED_SUCCESS: &str = "Closed analysis: SUCCESS";
pub const NOTE_CLOSED_FAILED: &str = "Closed analysis: FAILED";
pub const NOTE_CONNECTION_ERROR: &str = "Closed analysis prematurely because of connection error";

/// Note appended when a stage reports `Failure`.
pub fn failure_note(stage: Stage) -> &'static str {
	match stage {
		Stage::InitializeAnalysis => "Could not start analysis",
		Stage::ImportInputFiles => "Could not find all input files",
		Stage::CleanRun => "Could not finish script",
		Stage::OutputFiles => "Could not find all output files",
	}
}

/// Note appended when a stage reports `Success`.
///
/// Only the script boundaries are announced.
pub fn success_note(stage: Stage) -> Option<&'static str> {
	match stage {
		Stage::ImportInputFiles => Some(NOTE_STARTED_SCRIPT),
		Stage::CleanRun => Some(NOTE_FINISHED_SCRIPT),
		Stage::InitializeAnalysis | Stage::OutputFiles => None,
	}
}

/// Requests for the surrounding UI, drained after each dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiSignal {
	/// The attempt ended; the analysis list should refetch last-run metadata.
	RefreshAnalysisList,
	/// The job succeeded; switch focus to its outputs.
	ShowOutputs,
}

/// Lifecycle of the connection as seen by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// No attempt has been started.
	#[default]
	Idle,
	/// The stream is open and nothing has ended the attempt yet.
	Open,
	/// The attempt was ended by a terminal message, transport error or stop.
	Finalized,
}

/// Outcome of handing an event to the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
	/// State updated (or nothing to do); keep the connection.
	Continue,
	/// The attempt was ended by this event; close the connection.
	Finalized,
	/// The attempt was already finalized; the event was dropped.
	Ignored,
}

#[derive(Debug)]
pub struct RunMonitor {
	status: AnalysisStatus,
	log: LogStore,
	phase: Phase,
	signals: VecDeque<UiSignal>,
}

impl RunMonitor {
	pub fn new() -> Self {
		Self {
			status: AnalysisStatus::new(),
			log: LogStore::new(),
			phase: Phase::Idle,
			signals: VecDeque::new(),
		}
	}

	pub fn status(&self) -> &AnalysisStatus {
		&self.status
	}

	pub fn log(&self) -> &LogStore {
		&self.log
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn is_open(&self) -> bool {
		self.phase == Phase::Open
	}

	/// Resets status and log for a fresh attempt and marks the stream open.
	pub fn begin(&mut self) {
		self.status = AnalysisStatus::started();
		self.log.reset(LogEntry::status_note(NOTE_QUEUED));
		self.phase = Phase::Open;
		self.signals.clear();
	}

	/// Applies one decoded frame.
	pub fn dispatch(&mut self, msg: WireMessage) -> Dispatch {
		if !self.is_open() {
			debug!(msg_type = msg.msg_type().as_str(), "dropping frame for finalized attempt");
			return Dispatch::Ignored;
		}

		match msg {
			WireMessage::Heartbeat => {
				debug!("heartbeat received");
				Dispatch::Continue
			}
			WireMessage::Stage { stage, result } => {
				self.on_stage(stage, result);
				Dispatch::Continue
			}
			WireMessage::Waiting(text) => {
				self.log.push(LogEntry::new(text, Category::Waiting));
				Dispatch::Continue
			}
			WireMessage::LogOut(text) => {
				self.log.push(LogEntry::new(text, Category::StandardOut));
				Dispatch::Continue
			}
			WireMessage::LogErr(text) => {
				self.log.push(LogEntry::new(text, Category::StandardErr));
				Dispatch::Continue
			}
			WireMessage::EndSuccess => {
				self.finalize(NOTE_CLOSED_SUCCESS, Some(RunStatus::Success));
				self.signals.push_back(UiSignal::ShowOutputs);
				info!(lines = self.log.len(), "analysis finished successfully");
				Dispatch::Finalized
			}
			WireMessage::EndFailure => {
				self.finalize(NOTE_CLOSED_FAILED, Some(RunStatus::Failed));
				info!(lines = self.log.len(), "analysis finished with failure");
				Dispatch::Finalized
			}
		}
	}

	/// Handles a dropped connection that was not preceded by a terminal frame.
	///
	/// The run status is left at its last value: the outcome is unknown.
	pub fn transport_error(&mut self, reason: &str) -> Dispatch {
		if !self.is_open() {
			debug!(reason, "ignoring transport error for finalized attempt");
			return Dispatch::Ignored;
		}
		warn!(reason, run_status = %self.status.run_status, "run stream failed");
		self.finalize(NOTE_CONNECTION_ERROR, None);
		Dispatch::Finalized
	}

	/// Ends the attempt on user request. No-op unless the stream is open.
	pub fn stop(&mut self) -> Dispatch {
		if !self.is_open() {
			return Dispatch::Ignored;
		}
		info!("run stopped by user");
		self.finalize(NOTE_STOPPED, Some(RunStatus::StoppedByUser));
		Dispatch::Finalized
	}

	/// Takes all queued UI signals in the order they were raised.
	pub fn take_signals(&mut self) -> Vec<UiSignal> {
		self.signals.drain(..).collect()
	}

	fn on_stage(&mut self, stage: Stage, result: StageResult) {
		debug!(%stage, %result, "stage update");
		self.status.set(stage, result);
		let note = match result {
			StageResult::Failure => Some(failure_note(stage)),
			StageResult::Success => success_note(stage),
			StageResult::NotApplicable | StageResult::Pending => None,
		};
		if let Some(note) = note {
			self.log.push(LogEntry::status_note(note));
		}
	}

	fn finalize(&mut self, note: &str, run_status: Option<RunStatus>) {
		self.log.push(LogEntry::status_note(note));
		if let Some(run_status) = run_status {
			self.status.run_status = run_status;
		}
		self.status.running = false;
		self.phase = Phase::Finalized;
		self.signals.push_back(UiSignal::RefreshAnalysisList);
	}
}

impl Default for RunMonitor {
	fn default() -> Self {
		Self::new()
	}
}
