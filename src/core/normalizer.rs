use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::domain::{AdopterPreferences, DEFAULT_AGE_MAX, DEFAULT_AGE_MIN};

/// Errors raised when questionnaire answers have the wrong shape
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("expected a JSON object of questionnaire answers")]
    NotAnObject,

    #[error("field '{field}' must be {expected}")]
    InvalidField { field: &'static str, expected: &'static str },
}

/// Flatten raw questionnaire answers into a preference record
///
/// | key  | field          |
/// |------|----------------|
/// | `a1` | housing type   |
/// | `a3` | allergies      |
/// | `p1` | animal type    |
/// | `p2` | age range      |
/// | `p3` | size           |
/// | `p4` | activity level |
///
/// Missing answers fall back to neutral values; unparseable ages fall back to
/// `[0, 999]`.
pub fn normalize_preferences(answers: &Value) -> Result<AdopterPreferences, NormalizeError> {
    let answers = answers.as_object().ok_or(NormalizeError::NotAnObject)?;

    let (age_min, age_max) = age_range(answers)?;

    Ok(AdopterPreferences {
        housing_type: lowercase_string(answers, "a1")?,
        allergies: answers.get("a3").map(is_truthy).unwrap_or(false),
        activity_level: first_choice(answers, "p4")?,
        size_pref: first_choice(answers, "p3")?,
        age_min,
        age_max,
        animal_pref: first_choice(answers, "p1")?,
    })
}

fn lowercase_string(answers: &Map<String, Value>, field: &'static str) -> Result<String, NormalizeError> {
    match answers.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.to_lowercase()),
        Some(_) => Err(NormalizeError::InvalidField { field, expected: "a string" }),
    }
}

/// First entry of a multiple-choice answer. A bare string counts as a single choice.
fn first_choice(answers: &Map<String, Value>, field: &'static str) -> Result<String, NormalizeError> {
    let invalid = NormalizeError::InvalidField { field, expected: "a list of strings" };

    match answers.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.to_lowercase()),
        Some(Value::Array(items)) => match items.first() {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.to_lowercase()),
            Some(_) => Err(invalid),
        },
        Some(_) => Err(invalid),
    }
}

fn age_range(answers: &Map<String, Value>) -> Result<(i64, i64), NormalizeError> {
    let range = match answers.get("p2") {
        None | Some(Value::Null) => return Ok((DEFAULT_AGE_MIN, DEFAULT_AGE_MAX)),
        Some(Value::Object(range)) => range,
        Some(_) => {
            return Err(NormalizeError::InvalidField {
                field: "p2",
                expected: "an object with fromAge/toAge",
            })
        }
    };

    let from = range.get("fromAge").and_then(parse_age).unwrap_or(DEFAULT_AGE_MIN);
    let to = range.get("toAge").and_then(parse_age).unwrap_or(DEFAULT_AGE_MAX);
    Ok((from, to))
}

fn parse_age(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
