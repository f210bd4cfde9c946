//! Day-count bounds and the output token budget.
//!
//! Longer plans get proportionally more output tokens, but the per-day
//! contribution saturates at [`TOKEN_CAP`].

use serde_json::Value;

use crate::error::GenerationError;

/// Shortest plan the service will generate.
pub const MIN_DAYS: u32 = 7;
/// Longest plan the service will generate.
pub const MAX_DAYS: u32 = 100;

/// Fixed tokens reserved for the roast, reality check and closing quote.
pub const BASE_TOKENS: u32 = 800;
/// Tokens added per requested day.
pub const PER_DAY_TOKEN_RATE: u32 = 25;
/// Ceiling on the per-day contribution.
pub const TOKEN_CAP: u32 = 1200;

/// Compute the `max_tokens` value for a plan of `days` days.
///
/// `BASE_TOKENS + min(days * PER_DAY_TOKEN_RATE, TOKEN_CAP)`. Saturating
/// arithmetic keeps absurd inputs from overflowing.
pub fn token_budget(days: u32) -> u32 {
    BASE_TOKENS + days.saturating_mul(PER_DAY_TOKEN_RATE).min(TOKEN_CAP)
}

/// Reject day counts outside `MIN_DAYS..=MAX_DAYS`.
pub fn validate_days(days: u32) -> Result<u32, GenerationError> {
    if (MIN_DAYS..=MAX_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(GenerationError::InvalidRequest(format!(
            "days must be between {MIN_DAYS} and {MAX_DAYS}, got {days}"
        )))
    }
}

/// Extract a day count from an untrusted JSON value.
///
/// Accepts integral numbers only (`30` and `30.0` are fine, `30.5` and
/// `"30"` are not), then applies [`validate_days`].
pub fn days_from_json(value: &Value) -> Result<u32, GenerationError> {
    let invalid = || GenerationError::InvalidRequest(format!("days must be an integer, got {value}"));

    let days = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else if let Some(f) = n.as_f64() {
                if f.fract() != 0.0 || f < 0.0 || f > u32::MAX as f64 {
                    return Err(invalid());
                }
                f as u64
            } else {
                return Err(invalid());
            }
        }
        _ => return Err(invalid()),
    };

    let days = u32::try_from(days).map_err(|_| invalid())?;
    validate_days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn budget_examples() {
        assert_eq!(token_budget(7), 975);
        assert_eq!(token_budget(30), 1550);
        assert_eq!(token_budget(80), 2000);
        assert_eq!(token_budget(100), 2000);
    }

    #[test]
    fn budget_saturates_from_48_days() {
        assert_eq!(token_budget(47), 800 + 47 * 25);
        assert_eq!(token_budget(48), 2000);
        for days in 48..=MAX_DAYS {
            assert_eq!(token_budget(days), 2000, "days={days}");
        }
    }

    #[test]
    fn budget_never_overflows() {
        assert_eq!(token_budget(u32::MAX), 2000);
    }

    #[test]
    fn budget_matches_formula_for_all_valid_days() {
        for days in MIN_DAYS..=MAX_DAYS {
            assert_eq!(token_budget(days), 800 + (days * 25).min(1200));
        }
    }

    #[test]
    fn validate_days_bounds() {
        assert!(validate_days(6).is_err());
        assert_eq!(validate_days(7).unwrap(), 7);
        assert_eq!(validate_days(100).unwrap(), 100);
        assert!(validate_days(101).is_err());
        assert!(validate_days(0).is_err());
    }

    #[test]
    fn days_from_json_accepts_integral_numbers() {
        assert_eq!(days_from_json(&json!(30)).unwrap(), 30);
        assert_eq!(days_from_json(&json!(30.0)).unwrap(), 30);
    }

    #[test]
    fn days_from_json_rejects_bad_values() {
        for value in [json!(7.5), json!(-7), json!("30"), json!(null), json!(5), json!(1e12)] {
            let err = days_from_json(&value).unwrap_err();
            assert!(
                matches!(err, GenerationError::InvalidRequest(_)),
                "value {value} should be rejected, got {err:?}"
            );
        }
    }
}
