// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::ops::Range;

use anport_monitor_core::LogStore;
use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Color, Style},
	widgets::StatefulWidget,
};

use crate::anchor::{ScrollAnchor, ScrollGeometry};
use crate::style::category_style;

/// Scroll position of a [`LogView`] plus the number of entries it may show.
///
/// `count` is the throttled rendered count published by the render ticker,
/// not the live log length.
#[derive(Debug, Clone)]
pub struct LogViewState {
	offset: usize,
	viewport_height: usize,
	count: usize,
	anchor: ScrollAnchor,
}

impl Default for LogViewState {
	fn default() -> Self {
		Self::new(ScrollAnchor::default())
	}
}

impl LogViewState {
	pub fn new(anchor: ScrollAnchor) -> Self {
		Self {
			offset: 0,
			viewport_height: 0,
			count: 0,
			anchor,
		}
	}

	pub fn with_margin(margin: usize) -> Self {
		Self::new(ScrollAnchor::new(margin))
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn count(&self) -> usize {
		self.count
	}

	pub fn viewport_height(&self) -> usize {
		self.viewport_height
	}

	pub fn anchor(&self) -> &ScrollAnchor {
		&self.anchor
	}

	pub fn geometry(&self) -> ScrollGeometry {
		ScrollGeometry {
			offset: self.offset,
			content_height: self.count,
			viewport_height: self.viewport_height,
		}
	}

	pub fn max_offset(&self) -> usize {
		self.geometry().max_offset()
	}

	/// Applies a new rendered count. Returns true when the view followed the
	/// log to its bottom.
	pub fn set_count(&mut self, count: usize) -> bool {
		if count == self.count {
			return false;
		}
		let previous = self.count;
		self.count = count;
		let follow = self.anchor.on_growth(previous, count);
		if follow {
			self.offset = self.max_offset();
		} else {
			self.offset = self.offset.min(self.max_offset());
		}
		follow
	}

	pub fn set_viewport_height(&mut self, height: usize) {
		self.viewport_height = height;
		self.offset = self.offset.min(self.max_offset());
	}

	pub fn scroll_up(&mut self, amount: usize) {
		self.offset = self.offset.saturating_sub(amount);
		self.anchor.scrolled();
	}

	pub fn scroll_down(&mut self, amount: usize) {
		self.offset = (self.offset + amount).min(self.max_offset());
		self.anchor.scrolled();
	}

	pub fn page_up(&mut self) {
		self.scroll_up(self.viewport_height.max(1));
	}

	pub fn page_down(&mut self) {
		self.scroll_down(self.viewport_height.max(1));
	}

	pub fn scroll_to_top(&mut self) {
		self.offset = 0;
		self.anchor.scrolled();
	}

	pub fn scroll_to_bottom(&mut self) {
		self.offset = self.max_offset();
		self.anchor.scrolled();
	}

	pub fn visible_range(&self) -> Range<usize> {
		let end = (self.offset + self.viewport_height).min(self.count);
		self.offset.min(end)..end
	}

	pub fn scrollbar_position(&self) -> f32 {
		let max = self.max_offset();
		if max == 0 {
			0.0
		} else {
			self.offset as f32 / max as f32
		}
	}
}

/// Renders the first `count` entries of a run log, one entry per row,
/// colored by category.
#[derive(Debug, Clone)]
pub struct LogView<'a> {
	log: &'a LogStore,
	show_scrollbar: bool,
	track_style: Style,
	thumb_style: Style,
}

impl<'a> LogView<'a> {
	pub fn new(log: &'a LogStore) -> Self {
		Self {
			log,
			show_scrollbar: true,
			track_style: Style::default().fg(Color::DarkGray),
			thumb_style: Style::default().fg(Color::Gray),
		}
	}

	pub fn show_scrollbar(mut self, show: bool) -> Self {
		self.show_scrollbar = show;
		self
	}

	pub fn track_style(mut self, style: Style) -> Self {
		self.track_style = style;
		self
	}

	pub fn thumb_style(mut self, style: Style) -> Self {
		self.thumb_style = style;
		self
	}

	fn render_scrollbar(&self, area: Rect, buf: &mut Buffer, state: &LogViewState) {
		let track_height = area.height as usize;
		let thumb_height = ((state.viewport_height as f32 / state.count as f32)
			* track_height as f32)
			.max(1.0) as usize;
		let thumb_offset = (state.scrollbar_position()
			* track_height.saturating_sub(thumb_height) as f32) as usize;
		let x = area.right() - 1;

		for y in 0..track_height {
			let (symbol, style) = if y >= thumb_offset && y < thumb_offset + thumb_height {
				("█", self.thumb_style)
			} else {
				("░", self.track_style)
			};
			buf[(x, area.y + y as u16)].set_symbol(symbol).set_style(style);
		}
	}
}

impl StatefulWidget for LogView<'_> {
	type State = LogViewState;

	fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
		state.set_viewport_height(area.height as usize);
		// Scrolls since the last paint have been applied; measure them now.
		let geometry = state.geometry();
		state.anchor.sample(geometry);

		if area.width == 0 || area.height == 0 {
			return;
		}

		let overflowing = state.count > state.viewport_height;
		let scrollbar = self.show_scrollbar && overflowing && area.width > 1;
		let text_width = if scrollbar { area.width - 1 } else { area.width };

		for (row, entry) in self.log.slice(state.visible_range()).iter().enumerate() {
			let text = entry.text().replace('\t', "    ");
			let text = text.trim_end_matches(['\r', '\n']);
			buf.set_stringn(
				area.x,
				area.y + row as u16,
				text,
				text_width as usize,
				category_style(entry.severity()),
			);
		}

		if scrollbar {
			self.render_scrollbar(area, buf, state);
		}
	}
}
