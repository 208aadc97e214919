use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde_json::Value;

pub const MIN_AGE: i32 = 5;
pub const MAX_AGE: i32 = 120;

pub const DOB_FORMAT: &str = "%Y-%m-%d";

static DOB_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("dob pattern compiles"));

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Calendar-year difference, month and day are ignored.
pub fn age(current_year: i32, birth_year: i32) -> i32 {
    current_year - birth_year
}

pub fn age_in_range(age: i32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

/// Strict `YYYY-MM-DD` parse used when a survey is submitted.
pub fn parse_dob(raw: &str) -> Result<NaiveDate, String> {
    if !DOB_SHAPE.is_match(raw) {
        return Err(format!(
            "time data '{raw}' does not match format '{DOB_FORMAT}'"
        ));
    }

    NaiveDate::parse_from_str(raw, DOB_FORMAT).map_err(|e| e.to_string())
}

/// Birth year of an already stored survey.
///
/// Only the first four characters are read, so `"1990-13-99"` or
/// `"1990xyz"` still yield 1990 even though submission would refuse them.
pub fn stored_birth_year(raw: &str) -> Result<i32, String> {
    let prefix: String = raw.chars().take(4).collect();

    prefix
        .trim()
        .parse()
        .map_err(|_| format!("Invalid birth year '{prefix}' in stored survey"))
}

/// Integer conversion applied to stored rating values.
pub fn coerce_rating(value: &Value) -> Result<i64, String> {
    let invalid = || format!("Invalid rating value {value}");

    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(int)
            } else if let Some(float) = number.as_f64().filter(|f| f.is_finite()) {
                // truncates toward zero
                Ok(float as i64)
            } else {
                Err(invalid())
            }
        }
        Value::Bool(flag) => Ok(i64::from(*flag)),
        Value::String(text) => text.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
