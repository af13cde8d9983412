// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anport_monitor_core::AnalysisStatus;
use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Color, Style, Stylize},
	text::{Line, Span},
	widgets::Widget,
};

use crate::style::{run_status_style, stage_glyph, stage_result_style};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Run summary: overall status, one row per stage, and the key that starts
/// or stops the run.
#[derive(Debug, Clone)]
pub struct RunnerBox<'a> {
	status: &'a AnalysisStatus,
	frame: usize,
	show_hint: bool,
}

impl<'a> RunnerBox<'a> {
	pub fn new(status: &'a AnalysisStatus) -> Self {
		Self {
			status,
			frame: 0,
			show_hint: true,
		}
	}

	/// Advances the running indicator; typically the render tick count.
	pub fn frame(mut self, frame: usize) -> Self {
		self.frame = frame;
		self
	}

	pub fn show_hint(mut self, show: bool) -> Self {
		self.show_hint = show;
		self
	}

	fn lines(&self) -> Vec<Line<'static>> {
		let mut header = vec![
			Span::raw("Status: ").bold(),
			Span::styled(
				self.status.run_status.label(),
				run_status_style(self.status.run_status),
			),
		];
		if self.status.running {
			header.push(Span::raw(" "));
			header.push(Span::styled(
				SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()],
				Style::default().fg(Color::Yellow),
			));
		}

		let mut lines = vec![Line::from(header)];
		for (stage, result) in self.status.stages() {
			lines.push(Line::from(vec![
				Span::styled(stage_glyph(result), stage_result_style(result)),
				Span::raw(" "),
				Span::raw(stage.label()),
			]));
		}

		if self.show_hint {
			let (key, action) = if self.status.running {
				("x", "Stop analysis")
			} else {
				("s", "Run analysis")
			};
			lines.push(Line::from(vec![
				Span::raw("[").fg(Color::DarkGray),
				Span::raw(key).bold().fg(Color::Cyan),
				Span::raw("] ").fg(Color::DarkGray),
				Span::raw(action),
			]));
		}
		lines
	}
}

impl Widget for RunnerBox<'_> {
	fn render(self, area: Rect, buf: &mut Buffer) {
		for (row, line) in self.lines().iter().enumerate().take(area.height as usize) {
			buf.set_line(area.x, area.y + row as u16, line, area.width);
		}
	}
}
