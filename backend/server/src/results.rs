//! # Results
//!
//! Summary statistics over every stored survey.
//!
//! ## Conventions
//! - Age uses only the first four characters of the stored dob, unlike submission
//! - Food percentages are per survey, not per mention
//! - Rating averages divide the sum by the total survey count, a category rated
//!   by 1 of 100 respondents is averaged over 100
//! - One bad stored survey fails the whole request
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{
    database::SurveyStore,
    error::AppError,
    survey::{DOB, FAVORITE_FOODS, RATINGS},
    utils::{age, coerce_rating, stored_birth_year},
};

pub const NO_SURVEYS: &str = "No Surveys Available.";

pub const PIZZA: &str = "Pizza";
pub const PASTA: &str = "Pasta";
pub const PAP_AND_WORS: &str = "Pap and Wors";

pub const MOVIES: &str = "movies";
pub const RADIO: &str = "radio";
pub const EAT_OUT: &str = "eatOut";
pub const TV: &str = "tv";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_surveys: u64,
    pub average_age: f64,
    pub max_age: i32,
    pub min_age: i32,

    pub percentage_pizza: f64,
    pub percentage_pasta: f64,
    pub percentage_pap_and_wors: f64,

    pub average_movies: f64,
    pub average_radio: f64,
    pub average_eat_out: f64,
    pub average_tv: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NoSurveys {
    pub message: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResultsResponse {
    Empty(NoSurveys),
    Summary(Summary),
}

pub async fn results(
    store: &dyn SurveyStore,
    current_year: i32,
) -> Result<ResultsResponse, AppError> {
    let survey_count = store.count().await?;

    if survey_count == 0 {
        return Ok(ResultsResponse::Empty(NoSurveys {
            message: NO_SURVEYS,
        }));
    }

    let records = store.find_all().await?;
    let summary = summarize(&records, survey_count, current_year)?;

    info!(
        "Summarized {} surveys ({} read)",
        summary.total_surveys,
        records.len()
    );

    Ok(ResultsResponse::Summary(summary))
}

/// Aggregates `records` against `survey_count`, the count taken before the
/// records were read. The two can differ when submissions race the read.
pub fn summarize(
    records: &[Value],
    survey_count: u64,
    current_year: i32,
) -> Result<Summary, AppError> {
    let ages = records
        .iter()
        .map(|record| record_age(record, current_year))
        .collect::<Result<Vec<_>, _>>()?;

    let (Some(&max_age), Some(&min_age)) = (ages.iter().max(), ages.iter().min()) else {
        return Err(AppError::Malformed(
            "No survey records could be read".to_string(),
        ));
    };

    let count = survey_count as f64;
    let total_age: i64 = ages.iter().map(|&age| i64::from(age)).sum();

    let mut foods: Vec<&str> = Vec::new();
    for record in records {
        food_mentions(record, &mut foods)?;
    }

    let percentage = |name: &str| {
        let mentions = foods.iter().filter(|&&food| food == name).count();
        mentions as f64 / count * 100.0
    };

    let average_rating = |category: &str| -> Result<f64, AppError> {
        let mut total = 0i64;

        for record in records {
            let ratings = record
                .get(RATINGS)
                .and_then(Value::as_object)
                .ok_or_else(|| AppError::Malformed("Stored survey has no ratings".to_string()))?;

            if let Some(value) = ratings.get(category) {
                let rating = coerce_rating(value).map_err(AppError::Malformed)?;
                total = total.checked_add(rating).ok_or_else(|| {
                    AppError::Malformed(format!("Rating total for {category} overflowed"))
                })?;
            }
        }

        Ok(total as f64 / count)
    };

    Ok(Summary {
        total_surveys: survey_count,
        average_age: total_age as f64 / count,
        max_age,
        min_age,

        percentage_pizza: percentage(PIZZA),
        percentage_pasta: percentage(PASTA),
        percentage_pap_and_wors: percentage(PAP_AND_WORS),

        average_movies: average_rating(MOVIES)?,
        average_radio: average_rating(RADIO)?,
        average_eat_out: average_rating(EAT_OUT)?,
        average_tv: average_rating(TV)?,
    })
}

/// Names a stored `favoriteFoods` contributes to the food tally.
///
/// A missing key adds nothing, an object contributes its keys and a string is
/// read character by character, so it can never match a food name. Any other
/// value fails the request.
fn food_mentions<'a>(record: &'a Value, foods: &mut Vec<&'a str>) -> Result<(), AppError> {
    match record.get(FAVORITE_FOODS) {
        None | Some(Value::String(_)) => {}
        Some(Value::Array(items)) => foods.extend(items.iter().filter_map(Value::as_str)),
        Some(Value::Object(map)) => foods.extend(map.keys().map(String::as_str)),
        Some(other) => {
            return Err(AppError::Malformed(format!(
                "Stored favoriteFoods is not iterable: {other}"
            )));
        }
    }

    Ok(())
}

fn record_age(record: &Value, current_year: i32) -> Result<i32, AppError> {
    let raw_dob = record
        .get(DOB)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Malformed("Stored survey has no dob".to_string()))?;

    let birth_year = stored_birth_year(raw_dob).map_err(AppError::Malformed)?;

    Ok(age(current_year, birth_year))
}
