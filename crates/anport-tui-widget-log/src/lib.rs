// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Terminal widgets for watching an analysis run.
//!
//! [`LogView`] draws the throttled prefix of a run log and keeps the viewport
//! pinned to the bottom while the user has not scrolled away.
//! [`RunnerBox`] draws the run status and per-stage results.

mod anchor;
mod runner_box;
mod style;
mod view;

pub use anchor::{ScrollAnchor, ScrollGeometry, SCROLL_BOTTOM_MARGIN};
pub use runner_box::RunnerBox;
pub use style::{category_style, run_status_style, stage_glyph, stage_result_style};
pub use view::{LogView, LogViewState};
