// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stage and run status tracking for a single run attempt.
//!
//! [`AnalysisStatus`] is a passive value object. It records the last reported
//! [`StageResult`] for each of the four [`Stage`]s and performs no transition
//! validation: the server is authoritative, so a `Success` followed by a
//! `Failure` for the same stage is stored as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A checkpoint a job passes through on the worker.
///
/// Stages are expected to complete in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
	InitializeAnalysis,
	ImportInputFiles,
	CleanRun,
	OutputFiles,
}

impl Stage {
	/// All stages in execution order.
	pub const ALL: [Stage; 4] = [
		Stage::InitializeAnalysis,
		Stage::ImportInputFiles,
		Stage::CleanRun,
		Stage::OutputFiles,
	];

	fn index(self) -> usize {
		match self {
			Stage::InitializeAnalysis => 0,
			Stage::ImportInputFiles => 1,
			Stage::CleanRun => 2,
			Stage::OutputFiles => 3,
		}
	}

	/// Checklist label shown next to the stage result.
	pub fn label(self) -> &'static str {
		match self {
			Stage::InitializeAnalysis => "Initialized analysis",
			Stage::ImportInputFiles => "Found all input files",
			Stage::CleanRun => "Finished script",
			Stage::OutputFiles => "Created all output files",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Stage::InitializeAnalysis => "InitializeAnalysis",
			Stage::ImportInputFiles => "ImportInputFiles",
			Stage::CleanRun => "CleanRun",
			Stage::OutputFiles => "OutputFiles",
		}
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The last reported outcome of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StageResult {
	#[default]
	#[serde(rename = "NA")]
	NotApplicable,
	Pending,
	Success,
	Failure,
}

impl StageResult {
	pub fn as_str(self) -> &'static str {
		match self {
			StageResult::NotApplicable => "NA",
			StageResult::Pending => "Pending",
			StageResult::Success => "Success",
			StageResult::Failure => "Failure",
		}
	}
}

impl fmt::Display for StageResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Overall outcome of the current run attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunStatus {
	#[default]
	NotRun,
	Running,
	Success,
	Failed,
	StoppedByUser,
}

impl RunStatus {
	/// Banner label for the run-control UI.
	pub fn label(self) -> &'static str {
		match self {
			RunStatus::NotRun => "Not Run",
			RunStatus::Running => "Running",
			RunStatus::Success => "Success",
			RunStatus::Failed => "Failed",
			RunStatus::StoppedByUser => "Stopped by user",
		}
	}
}

impl fmt::Display for RunStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Aggregate status of one run attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisStatus {
	stages: [StageResult; 4],
	/// True while the stream is open and not yet finalized.
	pub running: bool,
	pub run_status: RunStatus,
}

impl AnalysisStatus {
	/// Status before any run: every stage `NotApplicable`, run status `NotRun`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Status at the start of an attempt.
	pub fn started() -> Self {
		let mut status = Self::new();
		status.set(Stage::InitializeAnalysis, StageResult::Pending);
		status.running = true;
		status.run_status = RunStatus::Running;
		status
	}

	pub fn get(&self, stage: Stage) -> StageResult {
		self.stages[stage.index()]
	}

	/// Records `result` for `stage`, overwriting any previous value.
	pub fn set(&mut self, stage: Stage, result: StageResult) {
		self.stages[stage.index()] = result;
	}

	/// Iterates stages in execution order with their current result.
	pub fn stages(&self) -> impl Iterator<Item = (Stage, StageResult)> + '_ {
		Stage::ALL.iter().map(move |&stage| (stage, self.get(stage)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn new_status_is_not_run() {
		let status = AnalysisStatus::new();
		assert!(!status.running);
		assert_eq!(status.run_status, RunStatus::NotRun);
		for (_, result) in status.stages() {
			assert_eq!(result, StageResult::NotApplicable);
		}
	}

	#[test]
	fn started_status_marks_first_stage_pending() {
		let status = AnalysisStatus::started();
		assert!(status.running);
		assert_eq!(status.run_status, RunStatus::Running);
		assert_eq!(status.get(Stage::InitializeAnalysis), StageResult::Pending);
		assert_eq!(status.get(Stage::ImportInputFiles), StageResult::NotApplicable);
		assert_eq!(status.get(Stage::CleanRun), StageResult::NotApplicable);
		assert_eq!(status.get(Stage::OutputFiles), StageResult::NotApplicable);
	}

	#[test]
	fn regression_is_accepted() {
		let mut status = AnalysisStatus::started();
		status.set(Stage::CleanRun, StageResult::Success);
		status.set(Stage::CleanRun, StageResult::Failure);
		assert_eq!(status.get(Stage::CleanRun), StageResult::Failure);
	}

	#[test]
	fn stage_result_wire_names() {
		assert_eq!(
			serde_json::to_string(&StageResult::NotApplicable).unwrap(),
			"\"NA\""
		);
		let parsed: StageResult = serde_json::from_str("\"Failure\"").unwrap();
		assert_eq!(parsed, StageResult::Failure);
	}

	#[test]
	fn run_status_labels() {
		assert_eq!(RunStatus::NotRun.label(), "Not Run");
		assert_eq!(RunStatus::StoppedByUser.to_string(), "Stopped by user");
	}

	fn any_stage() -> impl Strategy<Value = Stage> {
		prop_oneof![
			Just(Stage::InitializeAnalysis),
			Just(Stage::ImportInputFiles),
			Just(Stage::CleanRun),
			Just(Stage::OutputFiles),
		]
	}

	fn any_result() -> impl Strategy<Value = StageResult> {
		prop_oneof![
			Just(StageResult::NotApplicable),
			Just(StageResult::Pending),
			Just(StageResult::Success),
			Just(StageResult::Failure),
		]
	}

	proptest! {
		/// Each stage holds the most recently written result regardless of
		/// how writes to other stages are interleaved.
		#[test]
		fn last_write_wins(updates in prop::collection::vec((any_stage(), any_result()), 0..64)) {
			let mut status = AnalysisStatus::new();
			for (stage, result) in &updates {
				status.set(*stage, *result);
			}
			for stage in Stage::ALL {
				let expected = updates
					.iter()
					.rev()
					.find(|(s, _)| *s == stage)
					.map(|(_, r)| *r)
					.unwrap_or(StageResult::NotApplicable);
				prop_assert_eq!(status.get(stage), expected);
			}
		}
	}
}
