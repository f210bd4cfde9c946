//! Shared test utilities for comeback integration tests.
//!
//! Provides a scripted [`CompletionProvider`], plan JSON fixtures, and
//! in-memory implementations of the account collaborators.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use comeback_core::GenerationError;
use comeback_core::account::{AuthError, AuthProvider, PlanStore, SavedPlan, StoreError, UserIdentity};
use comeback_core::provider::{Completion, CompletionProvider, CompletionRequest};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A well-formed plan with `entries` day entries, as a JSON value.
pub fn plan_value(entries: u32) -> Value {
    let daily: Vec<Value> = (1..=entries)
        .map(|d| {
            json!({
                "day": d,
                "task": format!("Do {d} push-ups"),
                "resource": "https://example.com/workouts",
                "motivation": format!("Day {d} beats day zero."),
            })
        })
        .collect();
    json!({
        "roast": "You watched three seasons in a weekend.",
        "realityCheck": "Fitness in a week is a stretch, but momentum isn't.",
        "dailyPlan": daily,
        "finalQuote": "Small steps, every day.",
    })
}

/// [`plan_value`] rendered as pretty JSON, the way a model tends to emit it.
pub fn plan_json(entries: u32) -> String {
    serde_json::to_string_pretty(&plan_value(entries)).unwrap_or_default()
}

/// Wrap `content` in an OpenAI chat completion response body.
pub fn chat_completion_body(content: &str, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": finish_reason,
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 480, "total_tokens": 600 },
    })
}

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Completion(Completion),
    /// Non-success HTTP status from the provider.
    Status(u16),
}

/// Provider returning scripted responses in order and recording requests.
#[derive(Default)]
pub struct StubProvider {
    responses: Mutex<VecDeque<StubResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    pub fn new(responses: impl IntoIterator<Item = StubResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers once with finished `content`.
    pub fn finished(content: impl Into<String>) -> Self {
        Self::new([StubResponse::Completion(Completion::finished(content))])
    }

    /// A provider that answers once with truncated `content`.
    pub fn truncated(content: impl Into<String>) -> Self {
        Self::new([StubResponse::Completion(Completion::truncated(content))])
    }

    /// A provider that answers once with HTTP `status`.
    pub fn status(status: u16) -> Self {
        Self::new([StubResponse::Status(status)])
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(StubResponse::Completion(c)) => Ok(c),
            Some(StubResponse::Status(status)) => Err(GenerationError::Provider {
                status,
                body: format!("{{\"error\":\"stub status {status}\"}}"),
            }),
            None => Err(GenerationError::Transport("stub provider has no scripted response".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory account collaborators
// ---------------------------------------------------------------------------

/// In-memory email/password auth with a single session.
#[derive(Default)]
pub struct MemoryAuth {
    users: Mutex<HashMap<String, (String, UserIdentity)>>,
    session: Mutex<Option<UserIdentity>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auth provider with `email` already signed in.
    pub fn signed_in(email: &str) -> Self {
        let auth = Self::new();
        let user = UserIdentity {
            id: format!("user-{email}"),
            email: email.to_string(),
        };
        if let Ok(mut session) = auth.session.lock() {
            *session = Some(user);
        }
        auth
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let mut users = self.users.lock().map_err(|_| AuthError::new("auth store poisoned"))?;
        if users.contains_key(email) {
            return Err(AuthError::new("User already registered"));
        }
        let user = UserIdentity {
            id: format!("user-{email}"),
            email: email.to_string(),
        };
        users.insert(email.to_string(), (password.to_string(), user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let user = {
            let users = self.users.lock().map_err(|_| AuthError::new("auth store poisoned"))?;
            match users.get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                _ => return Err(AuthError::new("Invalid login credentials")),
            }
        };
        if let Ok(mut session) = self.session.lock() {
            *session = Some(user.clone());
        }
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut session = self.session.lock().map_err(|_| AuthError::new("auth store poisoned"))?;
        *session = None;
        Ok(())
    }

    async fn current_user(&self) -> Option<UserIdentity> {
        self.session.lock().ok().and_then(|s| s.clone())
    }
}

/// In-memory plan store; can be told to fail every insert.
#[derive(Default)]
pub struct MemoryPlanStore {
    records: Mutex<Vec<SavedPlan>>,
    fail_with: Option<String>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn records(&self) -> Vec<SavedPlan> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn insert(&self, record: SavedPlan) -> Result<(), StoreError> {
        if let Some(message) = &self.fail_with {
            return Err(StoreError::new(message.clone()));
        }
        self.records
            .lock()
            .map_err(|_| StoreError::new("plan store poisoned"))?
            .push(record);
        Ok(())
    }
}
