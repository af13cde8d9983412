// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use anport_cli_config::CliOverrides;
use clap::{Parser, Subcommand};

/// Run and watch analyses on the analysis portal
#[derive(Parser, Debug)]
#[command(name = "anport", version, about)]
pub struct Cli {
	/// Portal API root, e.g. https://portal.example.org/api
	#[arg(long, global = true)]
	pub server_url: Option<String>,

	/// Session token sent as the session_id cookie
	#[arg(long, global = true)]
	pub session_token: Option<String>,

	/// How often the log view is refreshed, in milliseconds
	#[arg(long, global = true)]
	pub render_interval_ms: Option<u64>,

	/// Rows from the bottom that still count as following the log
	#[arg(long, global = true)]
	pub scroll_margin: Option<usize>,

	/// trace, debug, info, warn or error
	#[arg(long, global = true)]
	pub log_level: Option<String>,

	/// Config file to use instead of $XDG_CONFIG_HOME/anport/config.toml
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Start an analysis and watch its log
	Run {
		analysis_id: String,

		/// Print the log to stdout instead of opening the terminal UI
		#[arg(long)]
		plain: bool,
	},
	/// List analyses with their last run status
	List,
	/// Show an analysis and whether it can be run
	Status { analysis_id: String },
}

impl Cli {
	pub fn overrides(&self) -> CliOverrides {
		CliOverrides {
			server_url: self.server_url.clone(),
			session_token: self.session_token.clone(),
			render_interval_ms: self.render_interval_ms,
			scroll_margin: self.scroll_margin,
			log_level: self.log_level.clone(),
			config_file: self.config.clone(),
		}
	}

	/// True when the command takes over the terminal.
	pub fn uses_tui(&self) -> bool {
		matches!(self.command, Command::Run { plain: false, .. })
	}
}
