// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Real-time run monitor for the analysis portal.
//!
//! This crate connects to a job's run stream and keeps the run's status and
//! log current while the job executes on a remote worker.
//!
//! # Features
//!
//! - **Single connection**: one SSE stream per run attempt, closed exactly once
//! - **Ordered dispatch**: frames are applied one at a time in arrival order
//! - **Throttled rendering**: a [`RenderTicker`] publishes the log length at a
//!   fixed rate instead of per line
//! - **No retries**: any failure ends the attempt; the caller starts a new one
//!
//! # Example
//!
//! ```ignore
//! use anport_monitor::{ensure_ready, MonitorConfig, PortalClient, StreamClient, Update};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anport_monitor::Result<()> {
//!     let config = MonitorConfig::new("https://portal.example.org/api")?;
//!     let portal = PortalClient::new(config.clone())?;
//!     let analysis = ensure_ready(&portal, "weekly-coverage").await?;
//!
//!     let mut client = StreamClient::new(config)?;
//!     client.start(&analysis.id)?;
//!     while client.is_running() || client.ticker_active() {
//!         if let Update::Render { count } = client.next_update().await {
//!             println!("{count} lines");
//!         }
//!     }
//!     println!("{}", client.status().run_status);
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod config;
mod connection;
mod error;
mod ticker;

pub use catalog::{ensure_ready, AnalysisCatalog, PortalClient, SharedAnalysisCatalog};
pub use client::{StreamClient, Update};
pub use config::MonitorConfig;
pub use connection::{Connection, StreamEvent, StreamEventKind};
pub use error::{MonitorError, Result};
pub use ticker::{RenderTicker, DEFAULT_RENDER_INTERVAL};

// Re-export core types for convenience
pub use anport_common_http::SessionToken;
pub use anport_monitor_core::{
	AnalysisPackage, AnalysisStatus, AnalysisSummary, Category, Dispatch, LogEntry, LogStore,
	RunStatus, Stage, StageResult, UiSignal, WireMessage,
};
