// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anport_monitor_core::{Category, RunStatus, StageResult};
use ratatui::style::{Color, Modifier, Style};

pub fn category_style(category: Category) -> Style {
	match category {
		Category::StandardOut => Style::default().fg(Color::White),
		Category::StandardErr => Style::default().fg(Color::Red),
		Category::StatusNote => Style::default().fg(Color::Blue),
		Category::Waiting => Style::default().fg(Color::Magenta),
	}
}

pub fn stage_result_style(result: StageResult) -> Style {
	match result {
		StageResult::NotApplicable => Style::default().fg(Color::DarkGray),
		StageResult::Pending => Style::default().fg(Color::Yellow),
		StageResult::Success => Style::default().fg(Color::Green),
		StageResult::Failure => Style::default().fg(Color::Red),
	}
}

pub fn run_status_style(status: RunStatus) -> Style {
	let style = Style::default().add_modifier(Modifier::BOLD);
	match status {
		RunStatus::NotRun => style.fg(Color::DarkGray),
		RunStatus::Running => style.fg(Color::Yellow),
		RunStatus::Success => style.fg(Color::Green),
		RunStatus::Failed => style.fg(Color::Red),
		RunStatus::StoppedByUser => style.fg(Color::Magenta),
	}
}

/// Single-cell marker drawn next to a stage label.
pub fn stage_glyph(result: StageResult) -> &'static str {
	match result {
		StageResult::NotApplicable => "○",
		StageResult::Pending => "◐",
		StageResult::Success => "✓",
		StageResult::Failure => "✗",
	}
}
