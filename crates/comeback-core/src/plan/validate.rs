//! JSON parsing and schema validation of model output.
//!
//! Validation walks the parsed [`Value`] by hand instead of deserializing
//! straight into [`ComebackPlan`] so every rejection names the offending
//! field (`dailyPlan[3].task`, `finalQuote`, ...). Checks:
//! - The top level is an object with non-empty string `roast`,
//!   `realityCheck` and `finalQuote`.
//! - `dailyPlan` is an array of exactly the requested number of entries.
//! - Entry `i` has `day == i + 1`, so day numbers are `1..=days` with no
//!   gaps, duplicates or reordering.
//! - Every entry has a non-empty `task` and string `resource`/`motivation`.

use serde_json::{Map, Value};

use super::types::{ComebackPlan, DayTask};
use crate::error::GenerationError;

const TOP_LEVEL_FIELDS: [&str; 4] = ["roast", "realityCheck", "dailyPlan", "finalQuote"];

/// Parse repaired model output as JSON.
///
/// `raw` is the provider's text before repair and is carried in the error
/// for diagnostics.
pub fn parse_json(repaired: &str, raw: &str) -> Result<Value, GenerationError> {
    serde_json::from_str(repaired).map_err(|e| GenerationError::MalformedJson {
        raw: raw.to_string(),
        message: e.to_string(),
    })
}

/// Validate a parsed value against the plan schema for `days` days.
pub fn validate_plan(value: Value, days: u32) -> Result<ComebackPlan, GenerationError> {
    let Value::Object(mut root) = value else {
        return Err(GenerationError::schema("$", "expected a JSON object"));
    };

    // Report every absent top-level field at once.
    let missing: Vec<&str> = TOP_LEVEL_FIELDS
        .iter()
        .copied()
        .filter(|f| root.get(*f).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(GenerationError::schema(missing.join(", "), "required field missing"));
    }

    let roast = take_text(&mut root, "roast", "roast")?;
    let reality_check = take_text(&mut root, "realityCheck", "realityCheck")?;
    let final_quote = take_text(&mut root, "finalQuote", "finalQuote")?;

    let Some(Value::Array(entries)) = root.remove("dailyPlan") else {
        return Err(GenerationError::schema("dailyPlan", "expected an array"));
    };

    if entries.len() != days as usize {
        return Err(GenerationError::schema(
            "dailyPlan",
            format!("expected exactly {days} entries, got {}", entries.len()),
        ));
    }

    let daily_plan = entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| validate_day(idx, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ComebackPlan {
        roast,
        reality_check,
        daily_plan,
        final_quote,
    })
}

fn validate_day(idx: usize, entry: Value) -> Result<DayTask, GenerationError> {
    let path = format!("dailyPlan[{idx}]");
    let Value::Object(mut fields) = entry else {
        return Err(GenerationError::schema(path, "expected an object"));
    };

    let expected = idx as u64 + 1;
    let day = match fields.get("day") {
        Some(v) => v.as_u64().ok_or_else(|| {
            GenerationError::schema(format!("{path}.day"), "expected a positive integer")
        })?,
        None => return Err(GenerationError::schema(format!("{path}.day"), "required field missing")),
    };
    if day != expected {
        return Err(GenerationError::schema(
            format!("{path}.day"),
            format!("expected day {expected}, got {day}"),
        ));
    }

    let task = take_text(&mut fields, "task", &format!("{path}.task"))?;
    let resource = take_string(&mut fields, "resource", &format!("{path}.resource"))?;
    let motivation = take_string(&mut fields, "motivation", &format!("{path}.motivation"))?;

    Ok(DayTask {
        day: expected as u32,
        task,
        resource,
        motivation,
    })
}

/// Remove a string field, requiring it to be present.
fn take_string(map: &mut Map<String, Value>, key: &str, path: &str) -> Result<String, GenerationError> {
    match map.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Err(GenerationError::schema(path, "required field missing")),
        Some(_) => Err(GenerationError::schema(path, "expected a string")),
    }
}

/// Like [`take_string`], but blank strings count as missing.
fn take_text(map: &mut Map<String, Value>, key: &str, path: &str) -> Result<String, GenerationError> {
    let s = take_string(map, key, path)?;
    if s.trim().is_empty() {
        return Err(GenerationError::schema(path, "must not be empty"));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan_value(days: u32) -> Value {
        let daily: Vec<Value> = (1..=days)
            .map(|d| {
                json!({
                    "day": d,
                    "task": format!("task {d}"),
                    "resource": "https://example.com",
                    "motivation": "keep going",
                })
            })
            .collect();
        json!({
            "roast": "You binged again.",
            "realityCheck": "Seven days is short.",
            "dailyPlan": daily,
            "finalQuote": "Start now.",
        })
    }

    fn field_of(err: GenerationError) -> String {
        match err {
            GenerationError::SchemaValidation { field, .. } => field,
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_plan() {
        let plan = validate_plan(plan_value(7), 7).expect("should validate");
        assert_eq!(plan.daily_plan.len(), 7);
        let days: Vec<u32> = plan.daily_plan.iter().map(|t| t.day).collect();
        assert_eq!(days, (1..=7).collect::<Vec<_>>());
        assert_eq!(plan.roast, "You binged again.");
    }

    #[test]
    fn rejects_short_plan() {
        let err = validate_plan(plan_value(6), 7).unwrap_err();
        assert_eq!(field_of(err), "dailyPlan");
    }

    #[test]
    fn rejects_long_plan() {
        let err = validate_plan(plan_value(8), 7).unwrap_err();
        assert_eq!(field_of(err), "dailyPlan");
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate_plan(json!([1, 2, 3]), 7).unwrap_err();
        assert_eq!(field_of(err), "$");
    }

    #[test]
    fn names_all_missing_top_level_fields() {
        let mut value = plan_value(7);
        let obj = value.as_object_mut().unwrap();
        obj.remove("roast");
        obj.remove("finalQuote");
        let field = field_of(validate_plan(value, 7).unwrap_err());
        assert!(field.contains("roast"), "got {field}");
        assert!(field.contains("finalQuote"), "got {field}");
    }

    #[test]
    fn rejects_empty_roast() {
        let mut value = plan_value(7);
        value["roast"] = json!("   ");
        assert_eq!(field_of(validate_plan(value, 7).unwrap_err()), "roast");
    }

    #[test]
    fn rejects_daily_plan_that_is_not_an_array() {
        let mut value = plan_value(7);
        value["dailyPlan"] = json!({"day": 1});
        assert_eq!(field_of(validate_plan(value, 7).unwrap_err()), "dailyPlan");
    }

    #[test]
    fn rejects_gap_in_day_numbers() {
        let mut value = plan_value(7);
        value["dailyPlan"][3]["day"] = json!(9);
        assert_eq!(field_of(validate_plan(value, 7).unwrap_err()), "dailyPlan[3].day");
    }

    #[test]
    fn rejects_duplicate_day_numbers() {
        let mut value = plan_value(7);
        value["dailyPlan"][1]["day"] = json!(1);
        assert_eq!(field_of(validate_plan(value, 7).unwrap_err()), "dailyPlan[1].day");
    }

    #[test]
    fn rejects_non_integer_day() {
        let mut value = plan_value(7);
        value["dailyPlan"][0]["day"] = json!("1");
        assert_eq!(field_of(validate_plan(value, 7).unwrap_err()), "dailyPlan[0].day");
    }

    #[test]
    fn rejects_missing_task() {
        let mut value = plan_value(7);
        value["dailyPlan"][2].as_object_mut().unwrap().remove("task");
        assert_eq!(field_of(validate_plan(value, 7).unwrap_err()), "dailyPlan[2].task");
    }

    #[test]
    fn allows_empty_resource() {
        let mut value = plan_value(7);
        value["dailyPlan"][0]["resource"] = json!("");
        let plan = validate_plan(value, 7).expect("empty resource is allowed");
        assert_eq!(plan.daily_plan[0].resource, "");
    }

    #[test]
    fn rejects_non_string_motivation() {
        let mut value = plan_value(7);
        value["dailyPlan"][6]["motivation"] = json!(42);
        assert_eq!(
            field_of(validate_plan(value, 7).unwrap_err()),
            "dailyPlan[6].motivation"
        );
    }

    #[test]
    fn parse_json_keeps_raw_text() {
        let err = parse_json("{\"roast\": ", "  {\"roast\": ,").unwrap_err();
        match err {
            GenerationError::MalformedJson { raw, .. } => assert_eq!(raw, "  {\"roast\": ,"),
            other => panic!("expected MalformedJson, got {other:?}"),
        }
    }
}
