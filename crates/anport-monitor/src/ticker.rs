// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fixed-rate render clock.
//!
//! Frames can append many log lines at once. Rather than redrawing per line,
//! the UI redraws when the ticker fires, using the log length sampled at that
//! moment as the renderable count. This bounds render work to one refresh per
//! period regardless of log volume.

use std::future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct RenderTicker {
	period: Duration,
	interval: Option<Interval>,
	count: usize,
}

impl RenderTicker {
	pub fn new(period: Duration) -> Self {
		Self {
			period,
			interval: None,
			count: 0,
		}
	}

	/// (Re)arms the ticker for a new attempt whose log holds `seed_len`
	/// entries. The first tick fires one period from now.
	pub fn start(&mut self, seed_len: usize) {
		self.count = seed_len;
		let mut interval = interval_at(Instant::now() + self.period, self.period);
		interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
		self.interval = Some(interval);
	}

	pub fn is_active(&self) -> bool {
		self.interval.is_some()
	}

	pub fn period(&self) -> Duration {
		self.period
	}

	/// The last published count.
	pub fn count(&self) -> usize {
		self.count
	}

	/// Waits for the next tick. Never resolves while the ticker is halted.
	///
	/// Cancel safe.
	pub async fn tick(&mut self) {
		match self.interval.as_mut() {
			Some(interval) => {
				interval.tick().await;
			}
			None => future::pending::<()>().await,
		}
	}

	/// Publishes `len` as the renderable count.
	///
	/// When the run is no longer active this is the final flush and the
	/// ticker halts until the next [`start`](Self::start).
	pub fn sample(&mut self, len: usize, running: bool) -> usize {
		self.count = len;
		if !running && self.interval.take().is_some() {
			debug!(count = len, "render ticker halted");
		}
		len
	}
}

impl Default for RenderTicker {
	fn default() -> Self {
		Self::new(DEFAULT_RENDER_INTERVAL)
	}
}
