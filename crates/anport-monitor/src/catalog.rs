// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analysis catalog: the REST collaborators of the run monitor.
//!
//! The monitor needs two things from the rest of the portal: a readiness
//! check that resolves a job id before a run is started, and the analysis
//! list, which is refetched after every run so last-run metadata is current.

use std::sync::Arc;

use anport_common_http::{with_session, SessionToken};
use anport_monitor_core::{AnalysisPackage, AnalysisSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};

#[async_trait]
pub trait AnalysisCatalog: Send + Sync {
	/// Fetches a single analysis. Succeeds only for analyses that can be run.
	async fn analysis(&self, id: &str) -> Result<AnalysisPackage>;

	/// Fetches the analysis list with last-run metadata.
	async fn analyses(&self) -> Result<Vec<AnalysisSummary>>;
}

pub type SharedAnalysisCatalog = Arc<dyn AnalysisCatalog>;

/// Resolves `id` to a runnable analysis, mapping any failure to
/// [`MonitorError::NotReady`].
pub async fn ensure_ready(catalog: &dyn AnalysisCatalog, id: &str) -> Result<AnalysisPackage> {
	catalog.analysis(id).await.map_err(|e| MonitorError::NotReady {
		id: id.to_string(),
		reason: e.to_string(),
	})
}

/// [`AnalysisCatalog`] backed by the portal REST API.
#[derive(Debug, Clone)]
pub struct PortalClient {
	config: MonitorConfig,
	http: Client,
}

impl PortalClient {
	pub fn new(config: MonitorConfig) -> Result<Self> {
		let http = anport_common_http::client_with_timeout(config.request_timeout)?;
		Ok(Self { config, http })
	}

	fn session_token(&self) -> Option<&SessionToken> {
		self.config.session_token.as_ref()
	}

	async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
		let url = self.config.endpoint(segments)?;
		debug!(url = %url, "portal request");
		let response = with_session(self.http.get(url), self.session_token())
			.send()
			.await?;

		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			return Err(MonitorError::ServerError { status, message });
		}

		Ok(response.json().await?)
	}
}

#[async_trait]
impl AnalysisCatalog for PortalClient {
	#[instrument(skip(self))]
	async fn analysis(&self, id: &str) -> Result<AnalysisPackage> {
		self.get_json(&["analysis", id]).await
	}

	#[instrument(skip(self))]
	async fn analyses(&self) -> Result<Vec<AnalysisSummary>> {
		self.get_json(&["analyses"]).await
	}
}
