// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anport_monitor_core::{AnalysisStatus, Category, LogEntry, LogStore, RunStatus, Stage, StageResult};
use anport_tui_widget_log::{LogView, LogViewState, RunnerBox};
use ratatui::backend::TestBackend;
use ratatui::style::Color;
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;

fn buffer_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
	let buffer = terminal.backend().buffer();
	let area = buffer.area;
	(area.y..area.y + area.height)
		.map(|y| {
			(area.x..area.x + area.width)
				.map(|x| buffer[(x, y)].symbol())
				.collect::<String>()
		})
		.collect()
}

fn numbered_log(lines: usize) -> LogStore {
	let mut log = LogStore::seeded(LogEntry::new("line 0", Category::StandardOut));
	for i in 1..lines {
		log.push(LogEntry::new(format!("line {i}"), Category::StandardOut));
	}
	log
}

fn draw_log(terminal: &mut Terminal<TestBackend>, log: &LogStore, state: &mut LogViewState) {
	terminal
		.draw(|frame| {
			LogView::new(log).render(frame.area(), frame.buffer_mut(), state);
		})
		.unwrap();
}

#[test]
fn renders_only_the_published_count() {
	let log = numbered_log(5);
	let mut state = LogViewState::default();
	state.set_count(3);

	let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
	draw_log(&mut terminal, &log, &mut state);

	let lines = buffer_lines(&terminal);
	assert!(lines[0].starts_with("line 0"));
	assert!(lines[2].starts_with("line 2"));
	assert_eq!(lines[3].trim(), "");
}

#[test]
fn pinned_view_shows_the_tail_with_scrollbar() {
	let log = numbered_log(30);
	let mut state = LogViewState::default();
	state.set_count(30);

	let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
	draw_log(&mut terminal, &log, &mut state);

	let lines = buffer_lines(&terminal);
	assert!(lines[0].starts_with("line 25 "), "{lines:?}");
	assert!(lines[4].starts_with("line 29 "), "{lines:?}");
	assert!(lines[4].ends_with('█'), "{lines:?}");
	assert_eq!(state.offset(), 25);
}

#[test]
fn scrolled_up_view_stays_put_as_log_grows() {
	let log = numbered_log(60);
	let mut state = LogViewState::default();
	state.set_count(30);

	let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
	draw_log(&mut terminal, &log, &mut state);
	state.scroll_to_top();
	draw_log(&mut terminal, &log, &mut state);
	assert!(!state.anchor().is_pinned());

	assert!(!state.set_count(60));
	draw_log(&mut terminal, &log, &mut state);
	let lines = buffer_lines(&terminal);
	assert!(lines[0].starts_with("line 0 "), "{lines:?}");

	state.scroll_to_bottom();
	draw_log(&mut terminal, &log, &mut state);
	assert!(state.anchor().is_pinned());
}

#[test]
fn categories_are_colored() {
	let mut log = LogStore::new();
	log.push(LogEntry::new("boom", Category::StandardErr));
	log.push(LogEntry::new("waiting for worker", Category::Waiting));
	let mut state = LogViewState::default();
	state.set_count(log.len());

	let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
	draw_log(&mut terminal, &log, &mut state);

	let buffer = terminal.backend().buffer();
	assert_eq!(buffer[(0, 0)].fg, Color::Blue);
	assert_eq!(buffer[(0, 1)].fg, Color::Red);
	assert_eq!(buffer[(0, 2)].fg, Color::Magenta);
	assert!(buffer_lines(&terminal)[0].starts_with("*** Not yet run ***"));
}

#[test]
fn runner_box_shows_running_status_and_stop_hint() {
	let mut status = AnalysisStatus::started();
	status.set(Stage::InitializeAnalysis, StageResult::Success);

	let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
	terminal
		.draw(|frame| {
			RunnerBox::new(&status)
				.frame(3)
				.render(frame.area(), frame.buffer_mut());
		})
		.unwrap();

	let lines = buffer_lines(&terminal);
	assert!(lines[0].starts_with("Status: Running ⠸"), "{lines:?}");
	assert!(lines[1].starts_with("✓ Initialized analysis"), "{lines:?}");
	assert!(lines[2].starts_with("○ Found all input files"), "{lines:?}");
	assert!(lines[4].starts_with("○ Created all output files"), "{lines:?}");
	assert!(lines[5].starts_with("[x] Stop analysis"), "{lines:?}");
}

#[test]
fn runner_box_after_run_offers_restart() {
	let mut status = AnalysisStatus::new();
	status.run_status = RunStatus::Failed;
	status.set(Stage::InitializeAnalysis, StageResult::Failure);

	let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
	terminal
		.draw(|frame| {
			RunnerBox::new(&status).render(frame.area(), frame.buffer_mut());
		})
		.unwrap();

	let lines = buffer_lines(&terminal);
	assert_eq!(lines[0].trim_end(), "Status: Failed");
	assert!(lines[1].starts_with("✗ Initialized analysis"));
	assert!(lines[5].starts_with("[s] Run analysis"));
}
