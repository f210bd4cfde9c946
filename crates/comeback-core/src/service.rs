//! Plan Generation Service.
//!
//! Stateless: each call computes a token budget, builds the prompt, makes
//! one provider call, then runs the repair -> parse -> validate pipeline.
//! The service returns a fully validated plan or exactly one error; there
//! are no partial results and no retries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::plan::{
    ComebackPlan, PlanRequest, SYSTEM_PROMPT, TEMPERATURE, build_user_prompt, parse_json,
    strip_trailing_commas, token_budget, validate_days, validate_plan,
};
use crate::provider::{CompletionProvider, CompletionRequest};

/// Anything that can turn a [`PlanRequest`] into a [`ComebackPlan`].
///
/// Implemented in-process by [`PlanService`] and over HTTP by
/// [`crate::client::RemotePlanClient`].
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, request: &PlanRequest) -> Result<ComebackPlan, GenerationError>;
}

/// Generates and validates comeback plans via a completion provider.
#[derive(Clone)]
pub struct PlanService {
    provider: Arc<dyn CompletionProvider>,
}

impl PlanService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Generate a plan for `request`.
    ///
    /// `confession`/`goals` presence is the caller's job; `days` is checked
    /// here again before it is used in any arithmetic.
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<ComebackPlan, GenerationError> {
        let result = self.run(request).await;
        match &result {
            Ok(plan) => info!(days = plan.days(), "plan generated"),
            Err(e) => warn!(kind = e.kind(), error = %e, "plan generation failed"),
        }
        result
    }

    async fn run(&self, request: &PlanRequest) -> Result<ComebackPlan, GenerationError> {
        let days = validate_days(request.days)?;
        let max_tokens = token_budget(days);
        debug!(days, max_tokens, provider = self.provider.name(), "generate_plan: calling provider");

        let completion = self
            .provider
            .complete(CompletionRequest {
                system: SYSTEM_PROMPT.to_string(),
                prompt: build_user_prompt(request),
                max_tokens,
                temperature: TEMPERATURE,
            })
            .await?;

        debug!(raw = %completion.content, "generate_plan: raw model output");

        // The truncation flag wins even if the partial text happens to parse.
        if completion.truncated {
            return Err(GenerationError::Truncated);
        }

        let repaired = strip_trailing_commas(&completion.content);
        let value = parse_json(&repaired, &completion.content)?;
        validate_plan(value, days)
    }
}

#[async_trait]
impl PlanGenerator for PlanService {
    async fn generate(&self, request: &PlanRequest) -> Result<ComebackPlan, GenerationError> {
        self.generate_plan(request).await
    }
}
