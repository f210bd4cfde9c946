//! HTTP client for a remote plan service (`comeback serve`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationError;
use crate::plan::{ComebackPlan, PlanRequest, parse_json, validate_plan};
use crate::service::PlanGenerator;

/// Calls the plan generation endpoint of a running service.
pub struct RemotePlanClient {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl RemotePlanClient {
    /// Deadline for one round trip; the service's own provider deadline
    /// plus headroom.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

    /// `endpoint` is the full URL of the generation route, e.g.
    /// `http://127.0.0.1:8787/generate-comeback-plan`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PlanGenerator for RemotePlanClient {
    async fn generate(&self, request: &PlanRequest) -> Result<ComebackPlan, GenerationError> {
        debug!(endpoint = %self.endpoint, days = request.days, "remote generate: sending");

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(GenerationError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        // A remote endpoint is held to the same shape as a local plan.
        let value = parse_json(&text, &text)?;
        validate_plan(value, request.days)
    }
}
