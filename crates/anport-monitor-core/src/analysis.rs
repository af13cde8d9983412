// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analysis metadata returned by the portal REST API.
//!
//! Only the fields the run monitor consumes are modelled strictly; the
//! remaining metadata is carried along for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{RunStatus, StageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageType {
	R,
	Stata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
	Analysis,
	Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
	#[serde(rename = "folderType")]
	pub folder_type: FolderType,
	#[serde(rename = "analysisId")]
	pub analysis_id: String,
	#[serde(rename = "fileName")]
	pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
	#[serde(rename = "fileName")]
	pub file_name: String,
	#[serde(default)]
	pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
	pub name: String,
	pub language: LanguageType,
	#[serde(default)]
	pub inputs: Vec<InputFile>,
	#[serde(default)]
	pub outputs: Vec<OutputFile>,
	#[serde(default)]
	pub topic: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(rename = "lastRunAt")]
	pub last_run_at: Option<DateTime<Utc>>,
	#[serde(rename = "lastRunBy", default)]
	pub last_run_by: String,
	#[serde(default)]
	pub scheduled: bool,
	#[serde(rename = "lastStatus", default)]
	pub last_status: StageResult,
}

impl AnalysisMetadata {
	/// Run status implied by the stored last result, for list display.
	pub fn last_run_status(&self) -> RunStatus {
		match self.last_status {
			StageResult::Success => RunStatus::Success,
			StageResult::Failure => RunStatus::Failed,
			StageResult::NotApplicable | StageResult::Pending => RunStatus::NotRun,
		}
	}
}

/// Entry of `GET /analyses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
	pub id: String,
	pub metadata: AnalysisMetadata,
}

/// Response of `GET /analysis/{id}`; its presence means the job can be run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPackage {
	pub id: String,
	pub metadata: AnalysisMetadata,
	#[serde(default)]
	pub code: String,
}
