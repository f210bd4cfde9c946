//! Account collaborators: authentication and saved-plan persistence.
//!
//! Both are external services; this module only fixes the interfaces the
//! Composer relies on. Their errors are independent of
//! [`crate::GenerationError`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::plan::{ComebackPlan, PlanRequest};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

/// Authentication failure with a message suitable for display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Email/password session provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    /// `None` when nobody is signed in.
    async fn current_user(&self) -> Option<UserIdentity>;
}

/// A plan as persisted against a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlan {
    pub id: Uuid,
    pub user_id: String,
    pub confession: String,
    pub goals: String,
    pub days: u32,
    pub plan: ComebackPlan,
    pub completed_days: Vec<u32>,
    pub created_at: DateTime<Utc>,
}

impl SavedPlan {
    pub fn new(
        user: &UserIdentity,
        request: &PlanRequest,
        plan: &ComebackPlan,
        completed_days: Vec<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user.id.clone(),
            confession: request.confession.clone(),
            goals: request.goals.clone(),
            days: request.days,
            plan: plan.clone(),
            completed_days,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to save plan: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Durable storage for saved plans.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn insert(&self, record: SavedPlan) -> Result<(), StoreError>;
}
