// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn filter(level: &str) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Logs to stderr, for commands that leave the terminal alone.
pub fn init_stderr(level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(filter(level))
		.with_writer(std::io::stderr)
		.init();
}

/// Logs to `path` so the terminal UI is not overwritten.
pub fn init_file(level: &str, path: &Path) -> Result<()> {
	if let Some(dir) = path.parent() {
		std::fs::create_dir_all(dir)
			.with_context(|| format!("creating log directory {}", dir.display()))?;
	}
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)
		.with_context(|| format!("opening log file {}", path.display()))?;

	tracing_subscriber::fmt()
		.with_env_filter(filter(level))
		.with_ansi(false)
		.with_writer(Mutex::new(file))
		.init();
	Ok(())
}
