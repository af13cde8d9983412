// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Line-oriented run output for pipes and CI logs.

use std::io::Write;

use anport_monitor::{AnalysisCatalog, AnalysisPackage, RunStatus, StreamClient, UiSignal, Update};
use anyhow::Result;
use tracing::{info, warn};

/// Starts `analysis`, writes each published log entry to `out` and returns
/// the final run status. Ctrl-C stops the run.
pub async fn run_plain(
	client: &mut StreamClient,
	catalog: &dyn AnalysisCatalog,
	analysis: &AnalysisPackage,
	out: &mut impl Write,
) -> Result<RunStatus> {
	client.start(&analysis.id)?;

	let ctrl_c = tokio::signal::ctrl_c();
	tokio::pin!(ctrl_c);
	let mut interrupted = false;
	let mut printed = 0;

	while client.is_running() || client.ticker_active() {
		tokio::select! {
			update = client.next_update() => {
				if let Update::Render { count } = update {
					for entry in client.log().slice(printed..count) {
						writeln!(out, "{}", entry.text())?;
					}
					out.flush()?;
					printed = printed.max(count);
				}
			}
			result = &mut ctrl_c, if !interrupted => {
				interrupted = true;
				match result {
					Ok(()) => {
						info!(job_id = %analysis.id, "interrupted, stopping run");
						client.stop();
					}
					Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
				}
			}
		}

		for signal in client.take_signals() {
			match signal {
				UiSignal::RefreshAnalysisList => refresh(catalog, &analysis.id).await,
				UiSignal::ShowOutputs => print_outputs(out, analysis)?,
			}
		}
	}

	Ok(client.status().run_status)
}

async fn refresh(catalog: &dyn AnalysisCatalog, id: &str) {
	match catalog.analyses().await {
		Ok(analyses) => {
			if let Some(summary) = analyses.iter().find(|a| a.id == id) {
				info!(
					job_id = %id,
					last_status = %summary.metadata.last_run_status(),
					"analysis list refreshed"
				);
			}
		}
		Err(e) => warn!(error = %e, "failed to refresh analysis list"),
	}
}

fn print_outputs(out: &mut impl Write, analysis: &AnalysisPackage) -> Result<()> {
	let outputs = &analysis.metadata.outputs;
	if outputs.is_empty() {
		return Ok(());
	}
	writeln!(out, "Outputs:")?;
	for output in outputs {
		writeln!(out, "  {}", output.file_name)?;
	}
	Ok(())
}

pub fn exit_code(status: RunStatus) -> std::process::ExitCode {
	if status == RunStatus::Success {
		std::process::ExitCode::SUCCESS
	} else {
		std::process::ExitCode::FAILURE
	}
}
