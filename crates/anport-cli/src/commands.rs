// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-shot commands that print and exit.

use std::io::{self, Write};

use anport_monitor::{ensure_ready, AnalysisCatalog, AnalysisPackage, AnalysisSummary};
use anyhow::{Context, Result};

pub async fn list(catalog: &dyn AnalysisCatalog) -> Result<()> {
	let analyses = catalog.analyses().await.context("fetching analyses")?;
	print_analyses(&mut io::stdout().lock(), &analyses)?;
	Ok(())
}

pub async fn status(catalog: &dyn AnalysisCatalog, id: &str) -> Result<()> {
	let analysis = ensure_ready(catalog, id).await?;
	print_analysis(&mut io::stdout().lock(), &analysis)?;
	Ok(())
}

pub fn print_analyses(out: &mut impl Write, analyses: &[AnalysisSummary]) -> io::Result<()> {
	if analyses.is_empty() {
		return writeln!(out, "No analyses");
	}

	let id_width = analyses.iter().map(|a| a.id.len()).max().unwrap_or(0).max(2);
	let name_width = analyses
		.iter()
		.map(|a| a.metadata.name.chars().count())
		.max()
		.unwrap_or(0)
		.max(4);

	writeln!(out, "{:id_width$}  {:name_width$}  LAST RUN", "ID", "NAME")?;
	for analysis in analyses {
		let scheduled = if analysis.metadata.scheduled {
			" (scheduled)"
		} else {
			""
		};
		writeln!(
			out,
			"{:id_width$}  {:name_width$}  {}{}",
			analysis.id,
			analysis.metadata.name,
			analysis.metadata.last_run_status(),
			scheduled
		)?;
	}
	Ok(())
}

pub fn print_analysis(out: &mut impl Write, analysis: &AnalysisPackage) -> io::Result<()> {
	let metadata = &analysis.metadata;
	writeln!(out, "{} ({})", metadata.name, analysis.id)?;
	writeln!(out, "Ready to run")?;
	writeln!(out, "Last run: {}", metadata.last_run_status())?;
	if let Some(at) = metadata.last_run_at {
		writeln!(out, "Last run at: {} by {}", at.to_rfc3339(), metadata.last_run_by)?;
	}
	writeln!(out, "Inputs: {}", metadata.inputs.len())?;
	if metadata.outputs.is_empty() {
		writeln!(out, "Outputs: none")?;
	} else {
		writeln!(out, "Outputs:")?;
		for output in &metadata.outputs {
			let visibility = if output.public { "public" } else { "private" };
			writeln!(out, "  {} ({visibility})", output.file_name)?;
		}
	}
	Ok(())
}
