//! Share-sheet payloads.

use crate::plan::ComebackPlan;

pub const SHARE_TITLE: &str = "My Comeback Plan 🚀";
pub const FALLBACK_MESSAGE: &str = "Copy this URL to share your motivation!";

/// Title/text/URL triple handed to a platform share mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_plan(plan: &ComebackPlan, url: impl Into<String>) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: format!("I'm making a comeback! {}", plan.final_quote),
            url: url.into(),
        }
    }
}

/// A platform share mechanism.
pub trait ShareTarget {
    /// `false` when the platform has no share mechanism.
    fn is_available(&self) -> bool;

    fn share(&self, payload: &SharePayload);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// No share mechanism; the message tells the user what to do instead.
    Fallback(&'static str),
}

/// Share `plan` through `target`, or return the fallback message.
pub fn share_plan(target: &dyn ShareTarget, plan: &ComebackPlan, url: &str) -> ShareOutcome {
    if !target.is_available() {
        return ShareOutcome::Fallback(FALLBACK_MESSAGE);
    }
    target.share(&SharePayload::for_plan(plan, url));
    ShareOutcome::Shared
}
