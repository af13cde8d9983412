// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stream client: the control surface for running and watching a job.
//!
//! [`StreamClient`] owns at most one [`Connection`] at a time, the
//! [`RunMonitor`] holding the attempt's status and log, and the
//! [`RenderTicker`]. It is driven from a single task: the caller awaits
//! [`StreamClient::next_update`] in its event loop, which applies stream
//! frames one at a time in arrival order and reports render ticks.
//!
//! ```ignore
//! let mut client = StreamClient::new(config)?;
//! client.start("analysis-id")?;
//! while client.is_running() || client.ticker_active() {
//!     if let Update::Render { count } = client.next_update().await {
//!         redraw(client.log(), count);
//!     }
//!     for signal in client.take_signals() {
//!         handle(signal);
//!     }
//! }
//! ```

use anport_monitor_core::{AnalysisStatus, Dispatch, LogStore, RunMonitor, UiSignal};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::connection::{Connection, StreamEvent, StreamEventKind};
use crate::error::Result;
use crate::ticker::RenderTicker;

/// What a call to [`StreamClient::next_update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
	/// A stream event was handed to the monitor.
	Frame(Dispatch),
	/// The ticker fired; `count` log entries are ready to render.
	Render { count: usize },
}

#[derive(Debug)]
pub struct StreamClient {
	config: MonitorConfig,
	http: Client,
	monitor: RunMonitor,
	ticker: RenderTicker,
	connection: Option<Connection>,
	/// Incremented on every `start`; events from older attempts are dropped.
	attempt: u64,
	job_id: Option<String>,
	events_tx: mpsc::UnboundedSender<StreamEvent>,
	events_rx: mpsc::UnboundedReceiver<StreamEvent>,
}

impl StreamClient {
	pub fn new(config: MonitorConfig) -> Result<Self> {
		let http = anport_common_http::streaming_client(config.connect_timeout)?;
		Ok(Self::with_http_client(config, http))
	}

	pub fn with_http_client(config: MonitorConfig, http: Client) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		let ticker = RenderTicker::new(config.render_interval);
		Self {
			config,
			http,
			monitor: RunMonitor::new(),
			ticker,
			connection: None,
			attempt: 0,
			job_id: None,
			events_tx,
			events_rx,
		}
	}

	/// Starts a new run attempt for `job_id`.
	///
	/// Any connection from a previous attempt is closed first. Resets the
	/// status to running and the log to its queued seed, opens the stream and
	/// arms the render ticker. Only fails if the stream URL cannot be built,
	/// in which case nothing has changed.
	pub fn start(&mut self, job_id: &str) -> Result<()> {
		let url = self.config.run_url(job_id)?;

		self.close_connection();
		self.attempt += 1;
		self.monitor.begin();
		self.ticker.start(self.monitor.log().len());
		self.job_id = Some(job_id.to_string());

		info!(job_id, attempt = self.attempt, "starting analysis run");
		self.connection = Some(Connection::open(
			self.http.clone(),
			url,
			self.config.session_token.clone(),
			self.attempt,
			self.events_tx.clone(),
		));
		Ok(())
	}

	/// Stops the current attempt on user request.
	///
	/// No-op when the stream is not open, so repeated calls, calls after a
	/// terminal frame and calls from teardown are all safe.
	pub fn stop(&mut self) {
		if self.monitor.stop() == Dispatch::Finalized {
			self.close_connection();
		}
	}

	/// Waits for the next stream event or render tick and applies it.
	///
	/// Cancel safe: nothing is consumed unless it is also applied.
	pub async fn next_update(&mut self) -> Update {
		tokio::select! {
			Some(event) = self.events_rx.recv() => Update::Frame(self.apply(event)),
			() = self.ticker.tick() => {
				let count = self
					.ticker
					.sample(self.monitor.log().len(), self.monitor.status().running);
				Update::Render { count }
			}
		}
	}

	/// Applies one stream event.
	pub fn apply(&mut self, event: StreamEvent) -> Dispatch {
		if event.attempt != self.attempt {
			debug!(
				event_attempt = event.attempt,
				attempt = self.attempt,
				"dropping event from previous attempt"
			);
			return Dispatch::Ignored;
		}

		let outcome = match event.kind {
			StreamEventKind::Message(msg) => self.monitor.dispatch(msg),
			StreamEventKind::TransportError(reason) => self.monitor.transport_error(&reason),
		};
		if outcome == Dispatch::Finalized {
			self.close_connection();
		}
		outcome
	}

	pub fn status(&self) -> &AnalysisStatus {
		self.monitor.status()
	}

	/// Read-only handle to the log of the current attempt.
	pub fn log(&self) -> &LogStore {
		self.monitor.log()
	}

	/// Number of log entries published by the last render tick.
	pub fn rendered_count(&self) -> usize {
		self.ticker.count()
	}

	pub fn is_running(&self) -> bool {
		self.monitor.status().running
	}

	/// True until the final count of a finished attempt has been published.
	pub fn ticker_active(&self) -> bool {
		self.ticker.is_active()
	}

	pub fn has_connection(&self) -> bool {
		self.connection.is_some()
	}

	pub fn job_id(&self) -> Option<&str> {
		self.job_id.as_deref()
	}

	pub fn attempt(&self) -> u64 {
		self.attempt
	}

	/// Takes the UI signals raised since the last call.
	pub fn take_signals(&mut self) -> Vec<UiSignal> {
		self.monitor.take_signals()
	}

	fn close_connection(&mut self) {
		if let Some(mut connection) = self.connection.take() {
			connection.close();
		}
	}
}

impl Drop for StreamClient {
	fn drop(&mut self) {
		self.stop();
		self.close_connection();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anport_monitor_core::{RunStatus, Stage, StageResult, WireMessage};

	fn client() -> StreamClient {
		let config = MonitorConfig::new("http://127.0.0.1:9/api").unwrap();
		StreamClient::with_http_client(config, Client::new())
	}

	fn frame(attempt: u64, msg: WireMessage) -> StreamEvent {
		StreamEvent {
			attempt,
			kind: StreamEventKind::Message(msg),
		}
	}

	#[test]
	fn stop_before_start_is_noop() {
		let mut client = client();
		client.stop();
		assert_eq!(client.status().run_status, RunStatus::NotRun);
		assert_eq!(client.log().len(), 1);
		assert!(client.take_signals().is_empty());
	}

	#[tokio::test]
	async fn start_resets_state_and_opens_connection() {
		let mut client = client();
		client.start("job-1").unwrap();
		assert!(client.is_running());
		assert!(client.has_connection());
		assert!(client.ticker_active());
		assert_eq!(client.log().len(), 1);
		assert_eq!(client.job_id(), Some("job-1"));
		assert_eq!(client.attempt(), 1);
		assert_eq!(
			client.status().get(Stage::InitializeAnalysis),
			StageResult::Pending
		);
	}

	#[tokio::test]
	async fn terminal_frame_closes_connection() {
		let mut client = client();
		client.start("job-1").unwrap();
		assert_eq!(
			client.apply(frame(1, WireMessage::EndFailure)),
			Dispatch::Finalized
		);
		assert!(!client.has_connection());
		assert_eq!(client.status().run_status, RunStatus::Failed);

		client.stop();
		assert_eq!(client.status().run_status, RunStatus::Failed);
	}

	#[tokio::test]
	async fn stop_twice_logs_once() {
		let mut client = client();
		client.start("job-1").unwrap();
		client.stop();
		client.stop();
		let stops = client
			.log()
			.iter()
			.filter(|e| e.text().contains("Stopped by user"))
			.count();
		assert_eq!(stops, 1);
		assert!(!client.has_connection());
		assert_eq!(client.status().run_status, RunStatus::StoppedByUser);
		assert_eq!(client.take_signals(), vec![UiSignal::RefreshAnalysisList]);
	}

	#[tokio::test]
	async fn events_from_previous_attempt_are_dropped() {
		let mut client = client();
		client.start("job-1").unwrap();
		client.start("job-1").unwrap();
		assert_eq!(client.attempt(), 2);
		assert_eq!(
			client.apply(frame(1, WireMessage::LogOut("stale".into()))),
			Dispatch::Ignored
		);
		assert_eq!(
			client.apply(frame(2, WireMessage::LogOut("fresh".into()))),
			Dispatch::Continue
		);
		assert_eq!(client.log().len(), 2);
		assert_eq!(client.log().get(1).unwrap().text(), "fresh");
	}

	#[tokio::test]
	async fn restart_while_running_resets_log() {
		let mut client = client();
		client.start("job-1").unwrap();
		client.apply(frame(1, WireMessage::LogOut("a".into())));
		assert_eq!(client.log().len(), 2);
		client.start("job-2").unwrap();
		assert_eq!(client.log().len(), 1);
		assert!(client.is_running());
		assert_eq!(client.job_id(), Some("job-2"));
	}

	#[tokio::test]
	async fn restart_resets_rendered_count_to_seed() {
		let mut client = client();
		client.start("job-1").unwrap();
		client.apply(frame(1, WireMessage::LogOut("a".into())));
		client.apply(frame(1, WireMessage::LogOut("b".into())));
		client.apply(frame(1, WireMessage::EndSuccess));
		let len = client.log().len();
		client.ticker.sample(len, client.is_running());
		assert_eq!(client.rendered_count(), len);

		client.start("job-1").unwrap();
		assert_eq!(client.rendered_count(), 1);
		assert_eq!(client.rendered_count(), client.log().len());
	}
}
