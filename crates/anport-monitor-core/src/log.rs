// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Append-only run log.
//!
//! The [`LogStore`] is the fast half of the log's dual store: producers append
//! to it as frames arrive, and the renderer reads it by index up to a count
//! that is published separately at a throttled rate. Indices stay valid for
//! the whole run attempt; the only destructive operation is [`LogStore::reset`].

use std::ops::Range;

/// Kind of a log line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
	StandardOut,
	StandardErr,
	StatusNote,
	Waiting,
}

/// A single immutable log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
	text: String,
	severity: Category,
}

impl LogEntry {
	pub fn new(text: impl Into<String>, severity: Category) -> Self {
		Self {
			text: text.into(),
			severity,
		}
	}

	/// A bracketed status line such as `*** Started script ***`.
	pub fn status_note(note: &str) -> Self {
		Self::new(format!("*** {note} ***"), Category::StatusNote)
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn severity(&self) -> Category {
		self.severity
	}
}

/// Ordered, append-only sequence of [`LogEntry`].
#[derive(Debug, Clone)]
pub struct LogStore {
	entries: Vec<LogEntry>,
}

impl LogStore {
	/// Store seeded for a job that has never been run in this session.
	pub fn new() -> Self {
		Self::seeded(LogEntry::status_note("Not yet run"))
	}

	pub fn seeded(seed: LogEntry) -> Self {
		Self {
			entries: vec![seed],
		}
	}

	/// Clears the store and reseeds it with a single entry.
	pub fn reset(&mut self, seed: LogEntry) {
		self.entries.clear();
		self.entries.push(seed);
	}

	pub fn push(&mut self, entry: LogEntry) {
		self.entries.push(entry);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&LogEntry> {
		self.entries.get(index)
	}

	/// Entries in `range`, clamped to the current length.
	pub fn slice(&self, range: Range<usize>) -> &[LogEntry] {
		let end = range.end.min(self.entries.len());
		let start = range.start.min(end);
		&self.entries[start..end]
	}

	pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
		self.entries.iter()
	}
}

impl Default for LogStore {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn new_store_has_seed() {
		let store = LogStore::new();
		assert_eq!(store.len(), 1);
		assert_eq!(store.get(0).unwrap().text(), "*** Not yet run ***");
		assert_eq!(store.get(0).unwrap().severity(), Category::StatusNote);
	}

	#[test]
	fn reset_leaves_exactly_the_seed() {
		let mut store = LogStore::new();
		store.push(LogEntry::new("a", Category::StandardOut));
		store.push(LogEntry::new("b", Category::StandardErr));
		store.reset(LogEntry::status_note("Queued analysis"));
		assert_eq!(store.len(), 1);
		assert_eq!(store.get(0).unwrap().text(), "*** Queued analysis ***");
	}

	#[test]
	fn slice_clamps_to_length() {
		let mut store = LogStore::new();
		store.push(LogEntry::new("a", Category::StandardOut));
		assert_eq!(store.slice(0..10).len(), 2);
		assert_eq!(store.slice(1..2)[0].text(), "a");
		assert!(store.slice(5..10).is_empty());
	}

	proptest! {
		/// Appends never disturb entries already handed out by index.
		#[test]
		fn indices_are_stable(lines in prop::collection::vec("[a-z0-9 ]{0,16}", 1..200)) {
			let mut store = LogStore::new();
			let mut previous_len = store.len();
			for (i, line) in lines.iter().enumerate() {
				store.push(LogEntry::new(line.clone(), Category::StandardOut));
				prop_assert!(store.len() > previous_len);
				previous_len = store.len();
				prop_assert_eq!(store.get(1).unwrap().text(), lines[0].as_str());
				prop_assert_eq!(store.get(i + 1).unwrap().text(), line.as_str());
			}
		}
	}
}
