// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the analysis run monitor.
//!
//! This crate holds everything about a run attempt that does not touch the
//! network: the stream wire format, the per-stage state, the append-only log
//! and the dispatch logic that ties them together. The connection itself
//! lives in `anport-monitor`; rendering lives in `anport-tui-widget-log`.
//!
//! # Overview
//!
//! - [`WireMessage`]: one decoded frame of `GET /run/{id}`
//! - [`AnalysisStatus`]: last reported [`StageResult`] per [`Stage`], plus the
//!   overall [`RunStatus`]
//! - [`LogStore`]: append-only [`LogEntry`] buffer with stable indices
//! - [`RunMonitor`]: applies frames, stops and transport errors under a
//!   single finalize-once guard

pub mod analysis;
pub mod error;
pub mod log;
pub mod monitor;
pub mod status;
pub mod wire;

pub use analysis::{
	AnalysisMetadata, AnalysisPackage, AnalysisSummary, FolderType, InputFile, LanguageType,
	OutputFile,
};
pub use error::{MonitorCoreError, Result};
pub use log::{Category, LogEntry, LogStore};
pub use monitor::{Dispatch, Phase, RunMonitor, UiSignal};
pub use status::{AnalysisStatus, RunStatus, Stage, StageResult};
pub use wire::{MessageType, RealTimeMessage, WireMessage};
