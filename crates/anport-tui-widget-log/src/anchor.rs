// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bottom-pinning for a growing log.
//!
//! The anchor caches whether the viewport was at the bottom. The cache is
//! refreshed lazily: a user scroll only marks it stale, and the geometry is
//! measured at the next paint, once the scroll has been applied. Growth events
//! consult the cached value synchronously.

/// Rows within which the viewport still counts as at the bottom.
pub const SCROLL_BOTTOM_MARGIN: usize = 5;

/// Scroll extent of a rendered window, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollGeometry {
	pub offset: usize,
	pub content_height: usize,
	pub viewport_height: usize,
}

impl ScrollGeometry {
	pub fn max_offset(&self) -> usize {
		self.content_height.saturating_sub(self.viewport_height)
	}

	/// True when `offset` is within `margin` rows of the bottom.
	pub fn is_at_bottom(&self, margin: usize) -> bool {
		self.offset + margin >= self.max_offset()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollAnchor {
	pinned: bool,
	margin: usize,
	sample_pending: bool,
}

impl ScrollAnchor {
	pub fn new(margin: usize) -> Self {
		Self {
			pinned: true,
			margin,
			sample_pending: false,
		}
	}

	pub fn is_pinned(&self) -> bool {
		self.pinned
	}

	pub fn margin(&self) -> usize {
		self.margin
	}

	/// Records a user-driven scroll; the pin state is re-measured at the next paint.
	pub fn scrolled(&mut self) {
		self.sample_pending = true;
	}

	pub fn sample_pending(&self) -> bool {
		self.sample_pending
	}

	/// Measures `geometry` if a scroll happened since the last paint.
	pub fn sample(&mut self, geometry: ScrollGeometry) -> bool {
		if self.sample_pending {
			self.pinned = geometry.is_at_bottom(self.margin);
			self.sample_pending = false;
		}
		self.pinned
	}

	/// Decides whether a change of the rendered count from `previous` to
	/// `count` should scroll to the new bottom.
	///
	/// A fresh run (count coming from at most the seed line, or shrinking
	/// because the log was reset) always re-pins.
	pub fn on_growth(&mut self, previous: usize, count: usize) -> bool {
		if previous <= 1 || count <= 1 || count < previous {
			self.pinned = true;
			self.sample_pending = false;
		}
		self.pinned
	}
}

impl Default for ScrollAnchor {
	fn default() -> Self {
		Self::new(SCROLL_BOTTOM_MARGIN)
	}
}
