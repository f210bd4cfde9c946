//! Client Request Composer.
//!
//! Holds the form, the current plan and its completion state. Generation
//! failures of any kind collapse into one generic notice for the user
//! (the distinct kind is logged), and the entered form values are kept so
//! the user can resubmit.

use thiserror::Error;
use tracing::{info, warn};

use crate::account::{AuthProvider, PlanStore, SavedPlan, StoreError};
use crate::export::render_text;
use crate::plan::{ComebackPlan, PlanRequest};
use crate::progress::{CompletionTracker, ProgressError};
use crate::service::PlanGenerator;
use crate::share::{ShareOutcome, ShareTarget, share_plan};

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanForm {
    pub confession: String,
    pub goals: String,
    pub days: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("all fields are required")]
    MissingFields,

    #[error("days must be a whole number, got {0:?}")]
    InvalidDays(String),
}

impl PlanForm {
    pub fn new(confession: impl Into<String>, goals: impl Into<String>, days: impl Into<String>) -> Self {
        Self {
            confession: confession.into(),
            goals: goals.into(),
            days: days.into(),
        }
    }

    /// Presence check plus integer parsing of `days`. Range checks are left
    /// to the service.
    pub fn validate(&self) -> Result<PlanRequest, FormError> {
        if self.confession.trim().is_empty() || self.goals.trim().is_empty() || self.days.trim().is_empty() {
            return Err(FormError::MissingFields);
        }
        let days = self
            .days
            .trim()
            .parse::<u32>()
            .map_err(|_| FormError::InvalidDays(self.days.clone()))?;
        Ok(PlanRequest::new(self.confession.clone(), self.goals.clone(), days))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notice {
    const fn success(title: &'static str, description: &'static str) -> Self {
        Self {
            kind: NoticeKind::Success,
            title,
            description,
        }
    }

    const fn failure(title: &'static str, description: &'static str) -> Self {
        Self {
            kind: NoticeKind::Failure,
            title,
            description,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

pub const MISSING_FIELDS: Notice = Notice::failure("Hold up! 🛑", "Fill out all fields - no shortcuts here!");
pub const INVALID_DAYS: Notice = Notice::failure("Hold up! 🛑", "Days must be a whole number, like 30.");
pub const PLAN_READY: Notice = Notice::success("Your Comeback Plan is Ready! 🚀", "Time to make it happen!");
pub const GENERATION_FAILED: Notice =
    Notice::failure("Oops! 😅", "Failed to generate your plan. Please try again!");
pub const PLAN_SAVED: Notice =
    Notice::success("Plan Saved! 💾", "Your comeback plan is now stored safely in your account!");
pub const SIGN_IN_REQUIRED: Notice =
    Notice::failure("Sign In Required", "Sign in or create an account to save your plan.");
pub const SAVE_FAILED: Notice = Notice::failure("Save Failed", "Couldn't save your plan. Please try again.");
pub const PLAN_EXPORTED: Notice = Notice::success("Plan Exported! 📄", "Your comeback plan is ready to go!");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaveError {
    /// The caller should offer sign-in and retry.
    #[error("sign in to save your plan")]
    NotSignedIn,

    #[error("there is no plan to save")]
    NothingToSave,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Form, current plan and per-plan state for one user session.
#[derive(Debug, Default)]
pub struct Composer {
    form: PlanForm,
    request: Option<PlanRequest>,
    plan: Option<ComebackPlan>,
    tracker: CompletionTracker,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &PlanForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PlanForm {
        &mut self.form
    }

    pub fn plan(&self) -> Option<&ComebackPlan> {
        self.plan.as_ref()
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Validate the form and request a plan from `generator`.
    ///
    /// On success the plan replaces the current one and completion state is
    /// reset. On failure nothing changes except the returned notice.
    pub async fn submit(&mut self, generator: &dyn PlanGenerator) -> Notice {
        let request = match self.form.validate() {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "submit: form rejected");
                return e.notice();
            }
        };

        match generator.generate(&request).await {
            Ok(plan) => {
                info!(days = plan.days(), "submit: plan received");
                self.tracker = CompletionTracker::new(plan.days());
                self.plan = Some(plan);
                self.request = Some(request);
                PLAN_READY
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "submit: generation failed");
                GENERATION_FAILED
            }
        }
    }

    /// Toggle completion of `day` in the current plan.
    pub fn toggle_day(&mut self, day: u32) -> Result<bool, ProgressError> {
        self.tracker.toggle(day)
    }

    /// Persist the current plan for the signed-in user.
    pub async fn save(&self, auth: &dyn AuthProvider, store: &dyn PlanStore) -> Result<Notice, SaveError> {
        let user = auth.current_user().await.ok_or(SaveError::NotSignedIn)?;
        let (Some(request), Some(plan)) = (&self.request, &self.plan) else {
            return Err(SaveError::NothingToSave);
        };

        let record = SavedPlan::new(&user, request, plan, self.tracker.completed_days());
        let id = record.id;
        store.insert(record).await?;
        info!(%id, user_id = %user.id, "plan saved");
        Ok(PLAN_SAVED)
    }

    /// Text export of the current plan.
    pub fn export_text(&self) -> Option<String> {
        self.plan.as_ref().map(render_text)
    }

    /// Share the current plan; `None` if there is no plan yet.
    pub fn share(&self, target: &dyn ShareTarget, url: &str) -> Option<ShareOutcome> {
        self.plan.as_ref().map(|plan| share_plan(target, plan, url))
    }

    /// Clear the form, the plan and completion state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl FormError {
    pub fn notice(&self) -> Notice {
        match self {
            Self::MissingFields => MISSING_FIELDS,
            Self::InvalidDays(_) => INVALID_DAYS,
        }
    }
}

impl SaveError {
    /// `NotSignedIn` asks for sign-in; the caller should then retry.
    pub fn notice(&self) -> Notice {
        match self {
            Self::NotSignedIn => SIGN_IN_REQUIRED,
            Self::NothingToSave | Self::Store(_) => SAVE_FAILED,
        }
    }
}
