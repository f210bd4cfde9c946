//! Wire and domain types for comeback plans.
//!
//! Field names follow the JSON contract shared with the model and with
//! browser callers (`realityCheck`, `dailyPlan`, `finalQuote`).

use serde::{Deserialize, Serialize};

/// One submission from the Composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Free-text description of what the user has been putting off.
    pub confession: String,
    /// Free-text description of what the user wants to achieve.
    pub goals: String,
    /// Length of the plan in days.
    pub days: u32,
}

impl PlanRequest {
    pub fn new(confession: impl Into<String>, goals: impl Into<String>, days: u32) -> Self {
        Self {
            confession: confession.into(),
            goals: goals.into(),
            days,
        }
    }
}

/// One entry of the daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTask {
    /// 1-based day number.
    pub day: u32,
    pub task: String,
    /// A URL or the name of a tool.
    pub resource: String,
    pub motivation: String,
}

/// The validated artifact returned by the plan service.
///
/// Once constructed it is never mutated; progress and persistence state
/// live alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComebackPlan {
    pub roast: String,
    pub reality_check: String,
    pub daily_plan: Vec<DayTask>,
    pub final_quote: String,
}

impl ComebackPlan {
    /// Number of days covered by the plan.
    pub fn days(&self) -> u32 {
        self.daily_plan.len() as u32
    }

    /// Look up the task for a 1-based day number.
    pub fn task_for_day(&self, day: u32) -> Option<&DayTask> {
        self.daily_plan.iter().find(|t| t.day == day)
    }
}
