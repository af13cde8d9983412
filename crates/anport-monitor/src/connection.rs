// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SSE (Server-Sent Events) connection to a job's run stream.
//!
//! A [`Connection`] reads `GET /run/{id}` in a background task and forwards
//! decoded frames, in arrival order, to its owner over a channel. It never
//! retries: the first transport failure, or the server closing the stream, is
//! forwarded as a single [`StreamEventKind::TransportError`] and the task ends.
//! Whether that error matters is decided by the owner's finalize-once guard.

use anport_common_http::{with_session, SessionToken};
use anport_monitor_core::WireMessage;
use eventsource_stream::{Event, Eventsource};
use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{MonitorError, Result};

/// An event read from the stream of one run attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
	/// Attempt number the connection was opened for.
	pub attempt: u64,
	pub kind: StreamEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEventKind {
	Message(WireMessage),
	/// The stream failed or ended; carries a description for logs.
	TransportError(String),
}

/// Owns the background task reading one run stream.
#[derive(Debug)]
pub struct Connection {
	attempt: u64,
	/// Handle to the background task.
	task_handle: Option<JoinHandle<()>>,
	/// Channel to signal shutdown.
	shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Connection {
	/// Opens the stream at `url` in a background task.
	pub fn open(
		http: Client,
		url: Url,
		session_token: Option<SessionToken>,
		attempt: u64,
		events: mpsc::UnboundedSender<StreamEvent>,
	) -> Self {
		let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

		let handle = tokio::spawn(async move {
			run_stream(http, url, session_token, attempt, events, shutdown_rx).await;
		});

		Self {
			attempt,
			task_handle: Some(handle),
			shutdown_tx: Some(shutdown_tx),
		}
	}

	pub fn attempt(&self) -> u64 {
		self.attempt
	}

	pub fn is_closed(&self) -> bool {
		self.task_handle.is_none()
	}

	/// Closes the stream. Safe to call more than once.
	pub fn close(&mut self) {
		if let Some(tx) = self.shutdown_tx.take() {
			let _ = tx.send(());
		}
		if let Some(handle) = self.task_handle.take() {
			handle.abort();
			debug!(attempt = self.attempt, "run stream closed");
		}
	}
}

impl Drop for Connection {
	fn drop(&mut self) {
		self.close();
	}
}

async fn run_stream(
	http: Client,
	url: Url,
	session_token: Option<SessionToken>,
	attempt: u64,
	events: mpsc::UnboundedSender<StreamEvent>,
	mut shutdown_rx: oneshot::Receiver<()>,
) {
	info!(url = %url, attempt, "connecting to run stream");

	let result = tokio::select! {
		result = connect_and_process(&http, &url, session_token.as_ref(), attempt, &events) => result,
		_ = &mut shutdown_rx => {
			debug!(attempt, "run stream received shutdown signal");
			return;
		}
	};

	let reason = match result {
		Ok(()) => "stream closed by server".to_string(),
		Err(e) => e.to_string(),
	};
	debug!(attempt, reason = %reason, "run stream ended");
	let _ = events.send(StreamEvent {
		attempt,
		kind: StreamEventKind::TransportError(reason),
	});
}

/// Connects to the run stream and forwards frames until disconnection.
async fn connect_and_process(
	http: &Client,
	url: &Url,
	session_token: Option<&SessionToken>,
	attempt: u64,
	events: &mpsc::UnboundedSender<StreamEvent>,
) -> Result<()> {
	let request = http
		.get(url.clone())
		.header(ACCEPT, "text/event-stream")
		.header(CACHE_CONTROL, "no-cache");

	let response = with_session(request, session_token)
		.send()
		.await
		.map_err(MonitorError::ConnectionFailed)?;

	if !response.status().is_success() {
		return Err(MonitorError::ServerError {
			status: response.status().as_u16(),
			message: response.text().await.unwrap_or_default(),
		});
	}

	info!(attempt, "run stream established");

	let mut event_stream = response.bytes_stream().eventsource();

	while let Some(event_result) = event_stream.next().await {
		match event_result {
			Ok(event) => {
				let Some(msg) = decode_event(&event) else {
					continue;
				};
				if events
					.send(StreamEvent {
						attempt,
						kind: StreamEventKind::Message(msg),
					})
					.is_err()
				{
					debug!(attempt, "stream owner dropped, closing");
					return Ok(());
				}
			}
			Err(e) => {
				return Err(MonitorError::SseStreamError(e.to_string()));
			}
		}
	}

	Ok(())
}

/// Decodes one SSE event, skipping comments and malformed frames.
fn decode_event(event: &Event) -> Option<WireMessage> {
	if event.data.is_empty() {
		return None;
	}

	match WireMessage::decode(&event.data) {
		Ok(msg) => {
			debug!(msg_type = msg.msg_type().as_str(), "run frame received");
			Some(msg)
		}
		Err(e) => {
			warn!(data = %event.data, error = %e, "failed to decode run frame");
			None
		}
	}
}
