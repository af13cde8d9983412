// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod app;
mod cli;
mod commands;
mod logging;
mod plain;
mod tui;

use std::process::ExitCode;
use std::sync::Arc;

use anport_cli_config::AnportConfig;
use anport_monitor::{ensure_ready, PortalClient, SharedAnalysisCatalog, StreamClient};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use app::App;
use cli::{Cli, Command};

fn main() -> ExitCode {
	let cli = Cli::parse();
	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(cli: Cli) -> Result<ExitCode> {
	let config = anport_cli_config::load_config_with_cli(cli.overrides())
		.context("loading configuration")?;

	if cli.uses_tui() {
		logging::init_file(&config.log_level, &config.paths.log_file())?;
	} else {
		logging::init_stderr(&config.log_level);
	}

	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.context("building runtime")?;
	runtime.block_on(dispatch(cli.command, config))
}

async fn dispatch(command: Command, config: AnportConfig) -> Result<ExitCode> {
	let monitor_config = config.monitor_config()?;
	let portal: SharedAnalysisCatalog = Arc::new(PortalClient::new(monitor_config.clone())?);

	match command {
		Command::List => {
			commands::list(portal.as_ref()).await?;
			Ok(ExitCode::SUCCESS)
		}
		Command::Status { analysis_id } => {
			commands::status(portal.as_ref(), &analysis_id).await?;
			Ok(ExitCode::SUCCESS)
		}
		Command::Run { analysis_id, plain } => {
			let analysis = ensure_ready(portal.as_ref(), &analysis_id).await?;
			info!(job_id = %analysis.id, name = %analysis.metadata.name, "analysis ready");
			let mut client = StreamClient::new(monitor_config)?;

			if plain {
				let status =
					plain::run_plain(&mut client, portal.as_ref(), &analysis, &mut std::io::stdout())
						.await?;
				info!(job_id = %analysis.id, status = %status, "run finished");
				Ok(plain::exit_code(status))
			} else {
				let app = App::new(analysis, client, config.scroll_margin);
				tui::run_tui(app, portal).await?;
				Ok(ExitCode::SUCCESS)
			}
		}
	}
}
