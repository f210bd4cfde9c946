//! Plan model and the request/response pipeline stages.
//!
//! The stages are deliberately separate functions so each can be tested on
//! its own: [`prompt`] builds the request, [`repair`] fixes trailing commas,
//! [`validate`] parses and checks the result.

pub mod budget;
pub mod prompt;
pub mod repair;
pub mod types;
pub mod validate;

pub use budget::{MAX_DAYS, MIN_DAYS, days_from_json, token_budget, validate_days};
pub use prompt::{SYSTEM_PROMPT, TEMPERATURE, build_user_prompt};
pub use repair::strip_trailing_commas;
pub use types::{ComebackPlan, DayTask, PlanRequest};
pub use validate::{parse_json, validate_plan};
