//! Comeback plan generation: prompt construction, provider adapters,
//! repair and validation of model output, and the client-side pieces that
//! consume the validated plan.

pub mod account;
pub mod client;
pub mod composer;
pub mod error;
pub mod export;
pub mod plan;
pub mod progress;
pub mod provider;
pub mod service;
pub mod share;

pub use error::GenerationError;
pub use plan::{ComebackPlan, DayTask, PlanRequest};
pub use service::{PlanGenerator, PlanService};
