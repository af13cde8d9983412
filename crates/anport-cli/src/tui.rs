// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::{self, Stdout};

use anport_monitor::SharedAnalysisCatalog;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{
	disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::App;

/// Starts the run and drives the terminal UI until the user quits.
pub async fn run_tui(mut app: App, catalog: SharedAnalysisCatalog) -> Result<()> {
	enable_raw_mode()?;
	io::stdout().execute(EnterAlternateScreen)?;

	let backend = CrosstermBackend::new(io::stdout());
	let mut terminal = Terminal::new(backend)?;

	let result = event_loop(&mut terminal, &mut app, catalog).await;

	disable_raw_mode()?;
	io::stdout().execute(LeaveAlternateScreen)?;

	result
}

async fn event_loop(
	terminal: &mut Terminal<CrosstermBackend<Stdout>>,
	app: &mut App,
	catalog: SharedAnalysisCatalog,
) -> Result<()> {
	let mut events = EventStream::new();
	let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel();

	app.start_run();

	loop {
		if app.take_dirty() {
			terminal.draw(|frame| app.render(frame))?;
		}

		tokio::select! {
			update = app.next_update() => app.on_update(update),
			event = events.next() => match event {
				Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
				Some(Ok(Event::Resize(..))) => app.mark_dirty(),
				Some(Ok(_)) => {}
				Some(Err(e)) => return Err(e.into()),
				None => break,
			},
			Some(result) = refresh_rx.recv() => app.on_analyses(result),
		}

		if app.take_refresh_request() {
			debug!("refreshing analysis list");
			let catalog = catalog.clone();
			let tx = refresh_tx.clone();
			tokio::spawn(async move {
				let _ = tx.send(catalog.analyses().await);
			});
		}

		if app.should_quit() {
			break;
		}
	}

	Ok(())
}
