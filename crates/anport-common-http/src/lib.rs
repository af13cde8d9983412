// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the analysis portal.
//!
//! This crate provides:
//! - Pre-configured HTTP clients with a consistent User-Agent header
//! - The `session_id` cookie credential used by every portal endpoint

mod client;
mod session;

pub use client::{builder, client_with_timeout, streaming_client, user_agent};
pub use session::{with_session, SessionToken, SESSION_COOKIE};
