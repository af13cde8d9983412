// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anport_monitor::{
	AnalysisPackage, AnalysisSummary, RunStatus, StreamClient, UiSignal, Update,
};
use anport_tui_widget_log::{run_status_style, LogView, LogViewState, RunnerBox};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
	layout::{Constraint, Direction, Layout},
	style::{Color, Modifier, Style, Stylize},
	text::{Line, Span},
	widgets::{Block, Borders, List, ListItem, Paragraph},
	Frame,
};
use tracing::{debug, warn};

const RUNNER_WIDTH: u16 = 34;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
	Log,
	Outputs,
}

pub struct App {
	analysis: AnalysisPackage,
	client: StreamClient,
	log_state: LogViewState,
	tab: Tab,
	last_status: RunStatus,
	notice: Option<String>,
	refresh_requested: bool,
	dirty: bool,
	ticks: usize,
	should_quit: bool,
}

impl App {
	pub fn new(analysis: AnalysisPackage, client: StreamClient, scroll_margin: usize) -> Self {
		let last_status = analysis.metadata.last_run_status();
		let mut log_state = LogViewState::with_margin(scroll_margin);
		log_state.set_count(client.log().len());
		Self {
			analysis,
			client,
			log_state,
			tab: Tab::Log,
			last_status,
			notice: None,
			refresh_requested: false,
			dirty: true,
			ticks: 0,
			should_quit: false,
		}
	}

	pub fn tab(&self) -> Tab {
		self.tab
	}

	pub fn last_status(&self) -> RunStatus {
		self.last_status
	}

	pub fn notice(&self) -> Option<&str> {
		self.notice.as_deref()
	}

	pub fn log_state(&self) -> &LogViewState {
		&self.log_state
	}

	pub fn should_quit(&self) -> bool {
		self.should_quit
	}

	pub fn mark_dirty(&mut self) {
		self.dirty = true;
	}

	/// True once per change that needs a redraw.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// True once per finished attempt; the caller fetches the list.
	pub fn take_refresh_request(&mut self) -> bool {
		std::mem::take(&mut self.refresh_requested)
	}

	pub async fn next_update(&mut self) -> Update {
		self.client.next_update().await
	}

	pub fn start_run(&mut self) {
		if self.client.is_running() {
			return;
		}
		match self.client.start(&self.analysis.id) {
			Ok(()) => {
				// the seed entry alone: a fresh attempt always re-pins the view
				self.log_state.set_count(self.client.log().len());
				self.tab = Tab::Log;
				self.notice = None;
			}
			Err(e) => {
				warn!(job_id = %self.analysis.id, error = %e, "failed to start run");
				self.notice = Some(format!("Could not start run: {e}"));
			}
		}
		self.dirty = true;
	}

	pub fn on_update(&mut self, update: Update) {
		if let Update::Render { count } = update {
			self.log_state.set_count(count);
			self.ticks = self.ticks.wrapping_add(1);
			self.dirty = true;
		}
		for signal in self.client.take_signals() {
			self.on_signal(signal);
		}
	}

	pub fn on_signal(&mut self, signal: UiSignal) {
		debug!(?signal, "ui signal");
		match signal {
			UiSignal::RefreshAnalysisList => self.refresh_requested = true,
			UiSignal::ShowOutputs => self.tab = Tab::Outputs,
		}
		self.dirty = true;
	}

	pub fn on_analyses(&mut self, result: anport_monitor::Result<Vec<AnalysisSummary>>) {
		match result {
			Ok(analyses) => {
				if let Some(summary) = analyses.iter().find(|a| a.id == self.analysis.id) {
					self.last_status = summary.metadata.last_run_status();
				}
			}
			Err(e) => {
				warn!(error = %e, "failed to refresh analysis list");
				self.notice = Some(format!("Could not refresh analysis list: {e}"));
			}
		}
		self.dirty = true;
	}

	pub fn handle_key(&mut self, key: KeyEvent) {
		self.dirty = true;
		if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
			self.should_quit = true;
			return;
		}

		match key.code {
			KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
			KeyCode::Char('s') => self.start_run(),
			KeyCode::Char('x') => self.client.stop(),
			KeyCode::Tab => {
				self.tab = match self.tab {
					Tab::Log => Tab::Outputs,
					Tab::Outputs => Tab::Log,
				};
			}
			KeyCode::Char('l') => self.tab = Tab::Log,
			KeyCode::Char('o') => self.tab = Tab::Outputs,
			KeyCode::Up | KeyCode::Char('k') => self.log_state.scroll_up(1),
			KeyCode::Down | KeyCode::Char('j') => self.log_state.scroll_down(1),
			KeyCode::PageUp => self.log_state.page_up(),
			KeyCode::PageDown => self.log_state.page_down(),
			KeyCode::Home | KeyCode::Char('g') => self.log_state.scroll_to_top(),
			KeyCode::End | KeyCode::Char('G') => self.log_state.scroll_to_bottom(),
			_ => {}
		}
	}

	pub fn render(&mut self, frame: &mut Frame) {
		let rows = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(1),
				Constraint::Min(3),
				Constraint::Length(1),
			])
			.split(frame.area());

		frame.render_widget(Paragraph::new(self.header_line()), rows[0]);

		let columns = Layout::default()
			.direction(Direction::Horizontal)
			.constraints([Constraint::Length(RUNNER_WIDTH), Constraint::Min(1)])
			.split(rows[1]);

		let runner_block = Block::default().title("Run").borders(Borders::ALL);
		let runner_inner = runner_block.inner(columns[0]);
		frame.render_widget(runner_block, columns[0]);
		frame.render_widget(
			RunnerBox::new(self.client.status()).frame(self.ticks),
			runner_inner,
		);

		let body_block = Block::default()
			.borders(Borders::ALL)
			.title(self.tabs_title());
		let body_inner = body_block.inner(columns[1]);
		frame.render_widget(body_block, columns[1]);

		match self.tab {
			Tab::Log => frame.render_stateful_widget(
				LogView::new(self.client.log()),
				body_inner,
				&mut self.log_state,
			),
			Tab::Outputs => frame.render_widget(self.outputs_list(), body_inner),
		}

		frame.render_widget(Paragraph::new(self.footer_line()), rows[2]);
	}

	fn tabs_title(&self) -> Line<'static> {
		let selected = Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED);
		let title = |label: &'static str, tab: Tab| {
			if self.tab == tab {
				Span::styled(label, selected)
			} else {
				Span::raw(label)
			}
		};
		Line::from(vec![
			title(" Log ", Tab::Log),
			Span::raw("|"),
			title(" Outputs ", Tab::Outputs),
		])
	}

	fn header_line(&self) -> Line<'static> {
		Line::from(vec![
			Span::raw(self.analysis.metadata.name.clone()).bold(),
			Span::raw(format!(" ({})", self.analysis.id)).fg(Color::DarkGray),
			Span::raw("  Last run: "),
			Span::styled(self.last_status.label(), run_status_style(self.last_status)),
		])
	}

	fn footer_line(&self) -> Line<'static> {
		if let Some(notice) = &self.notice {
			return Line::from(Span::raw(notice.clone()).fg(Color::Red));
		}
		let shortcuts = [
			("s", "Run"),
			("x", "Stop"),
			("Tab", "Switch"),
			("↑↓ PgUp PgDn", "Scroll"),
			("q", "Quit"),
		];
		let mut spans = Vec::new();
		for (i, (key, desc)) in shortcuts.into_iter().enumerate() {
			if i > 0 {
				spans.push(Span::raw(" | "));
			}
			spans.push(Span::raw(key).bold().fg(Color::Cyan));
			spans.push(Span::raw(" "));
			spans.push(Span::raw(desc));
		}
		Line::from(spans)
	}

	fn outputs_list(&self) -> List<'static> {
		let outputs = &self.analysis.metadata.outputs;
		if outputs.is_empty() {
			return List::new([ListItem::new("No output files declared")]);
		}
		List::new(outputs.iter().map(|output| {
			let visibility = if output.public { "public" } else { "private" };
			ListItem::new(Line::from(vec![
				Span::raw(output.file_name.clone()),
				Span::raw(format!(" ({visibility})")).fg(Color::DarkGray),
			]))
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anport_monitor::{
		MonitorConfig, MonitorError, StageResult, StreamEvent, StreamEventKind, WireMessage,
	};
	use anport_monitor_core::{AnalysisMetadata, LanguageType, OutputFile};
	use ratatui::backend::TestBackend;
	use ratatui::Terminal;

	fn metadata(last_status: StageResult) -> AnalysisMetadata {
		AnalysisMetadata {
			name: "Coverage".to_string(),
			language: LanguageType::Stata,
			inputs: Vec::new(),
			outputs: vec![OutputFile {
				file_name: "table.csv".to_string(),
				public: true,
			}],
			topic: String::new(),
			tags: Vec::new(),
			last_run_at: None,
			last_run_by: String::new(),
			scheduled: false,
			last_status,
		}
	}

	fn app() -> App {
		let analysis = AnalysisPackage {
			id: "a1".to_string(),
			metadata: metadata(StageResult::NotApplicable),
			code: String::new(),
		};
		let config = MonitorConfig::new("http://127.0.0.1:9/api").unwrap();
		App::new(analysis, StreamClient::new(config).unwrap(), 5)
	}

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn screen(app: &mut App) -> String {
		let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
		terminal.draw(|frame| app.render(frame)).unwrap();
		let buffer = terminal.backend().buffer();
		let area = buffer.area;
		(area.y..area.bottom())
			.map(|y| {
				(area.x..area.right())
					.map(|x| buffer[(x, y)].symbol())
					.collect::<String>()
			})
			.collect::<Vec<_>>()
			.join("\n")
	}

	#[test]
	fn quits_on_q_and_ctrl_c() {
		let mut first = app();
		first.handle_key(key(KeyCode::Char('q')));
		assert!(first.should_quit());

		let mut second = app();
		second.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
		assert!(second.should_quit());
	}

	#[test]
	fn tab_toggles_views() {
		let mut app = app();
		assert_eq!(app.tab(), Tab::Log);
		app.handle_key(key(KeyCode::Tab));
		assert_eq!(app.tab(), Tab::Outputs);
		app.handle_key(key(KeyCode::Char('l')));
		assert_eq!(app.tab(), Tab::Log);
	}

	#[test]
	fn show_outputs_signal_switches_tab() {
		let mut app = app();
		app.on_signal(UiSignal::ShowOutputs);
		assert_eq!(app.tab(), Tab::Outputs);
	}

	#[test]
	fn refresh_signal_is_taken_once() {
		let mut app = app();
		app.on_signal(UiSignal::RefreshAnalysisList);
		assert!(app.take_refresh_request());
		assert!(!app.take_refresh_request());
	}

	#[test]
	fn refreshed_list_updates_last_status() {
		let mut app = app();
		assert_eq!(app.last_status(), RunStatus::NotRun);
		app.on_analyses(Ok(vec![
			AnalysisSummary {
				id: "other".to_string(),
				metadata: metadata(StageResult::Failure),
			},
			AnalysisSummary {
				id: "a1".to_string(),
				metadata: metadata(StageResult::Success),
			},
		]));
		assert_eq!(app.last_status(), RunStatus::Success);
		assert!(app.notice().is_none());
	}

	#[test]
	fn failed_refresh_shows_notice() {
		let mut app = app();
		app.on_analyses(Err(MonitorError::ServerError {
			status: 502,
			message: "bad gateway".to_string(),
		}));
		assert_eq!(app.last_status(), RunStatus::NotRun);
		assert!(app.notice().unwrap().contains("502"));
	}

	#[test]
	fn render_updates_follow_the_log() {
		let mut app = app();
		assert_eq!(app.log_state().count(), 1);
		assert!(app.take_dirty());
		assert!(!app.take_dirty());
		app.on_update(Update::Render { count: 1 });
		assert!(app.take_dirty());
		assert_eq!(app.log_state().count(), 1);
	}

	#[test]
	fn renders_idle_screen() {
		let mut app = app();
		let text = screen(&mut app);
		assert!(text.contains("Coverage (a1)  Last run: Not Run"), "{text}");
		assert!(text.contains("Status: Not Run"), "{text}");
		assert!(text.contains("[s] Run analysis"), "{text}");
		assert!(text.contains("*** Not yet run ***"), "{text}");
	}

	#[test]
	fn renders_outputs_tab() {
		let mut app = app();
		app.handle_key(key(KeyCode::Char('o')));
		let text = screen(&mut app);
		assert!(text.contains("table.csv (public)"), "{text}");
	}

	fn push_lines(app: &mut App, count: usize) {
		let attempt = app.client.attempt();
		for i in 0..count {
			app.client.apply(StreamEvent {
				attempt,
				kind: StreamEventKind::Message(WireMessage::LogOut(format!("line {i}"))),
			});
		}
	}

	fn finish(app: &mut App) {
		let attempt = app.client.attempt();
		app.client.apply(StreamEvent {
			attempt,
			kind: StreamEventKind::Message(WireMessage::EndSuccess),
		});
	}

	fn publish(app: &mut App) {
		let count = app.client.log().len();
		app.on_update(Update::Render { count });
	}

	#[tokio::test]
	async fn restart_pins_view_after_scrolling_away() {
		let mut app = app();
		app.start_run();
		push_lines(&mut app, 30);
		publish(&mut app);
		screen(&mut app);

		app.handle_key(key(KeyCode::Home));
		screen(&mut app);
		assert_eq!(app.log_state().offset(), 0);
		assert!(!app.log_state().anchor().is_pinned());

		finish(&mut app);
		publish(&mut app);
		let first_run = app.log_state().count();

		app.start_run();
		assert_eq!(app.log_state().count(), 1);
		assert!(app.log_state().anchor().is_pinned());

		push_lines(&mut app, first_run + 10);
		publish(&mut app);
		screen(&mut app);
		assert!(app.log_state().count() > first_run);
		assert!(app.log_state().anchor().is_pinned());
		assert_eq!(app.log_state().offset(), app.log_state().max_offset());
	}
}
