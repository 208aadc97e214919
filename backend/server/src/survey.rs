//! # Submission
//!
//! Validation and storage of a single survey.
//!
//! ## Schema
//! - dob (**string**, `YYYY-MM-DD`, required)
//! - favoriteFoods (**array** of free-text names, required)
//! - ratings (**object**, category name to integer rating, required, may be partial)
//! - anything else is kept and stored untouched
//!
//! ## Checks, in order
//! 1. Body is a JSON object
//! 2. dob parses strictly, age (calendar years only) is within 5..=120
//! 3. favoriteFoods is an array
//! 4. ratings is an object, its values are only coerced when aggregating
use chrono::Datelike;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    database::SurveyStore,
    error::AppError,
    utils::{MAX_AGE, MIN_AGE, age, age_in_range, parse_dob},
};

pub const DOB: &str = "dob";
pub const FAVORITE_FOODS: &str = "favoriteFoods";
pub const RATINGS: &str = "ratings";

pub const SUBMITTED: &str = "Survey submitted successfully!";

#[derive(Serialize, Debug, PartialEq)]
pub struct SubmitResponse {
    pub message: &'static str,
}

#[derive(Debug)]
pub struct Survey {
    age: i32,
    document: Map<String, Value>,
}

impl Survey {
    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn favorite_foods(&self) -> &[Value] {
        self.document
            .get(FAVORITE_FOODS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn ratings(&self) -> Option<&Map<String, Value>> {
        self.document.get(RATINGS).and_then(Value::as_object)
    }

    pub fn into_document(self) -> Value {
        Value::Object(self.document)
    }
}

pub fn validate(body: &[u8], current_year: i32) -> Result<Survey, AppError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| AppError::Validation(e.to_string()))?;

    let Value::Object(document) = value else {
        return Err(AppError::Validation(
            "Survey should be a JSON object".to_string(),
        ));
    };

    validate_document(document, current_year)
}

pub fn validate_document(
    document: Map<String, Value>,
    current_year: i32,
) -> Result<Survey, AppError> {
    let raw_dob = document
        .get(DOB)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation("Date of birth is required".to_string()))?;

    let dob = parse_dob(raw_dob).map_err(AppError::Validation)?;
    let age = age(current_year, dob.year());

    if !age_in_range(age) {
        return Err(AppError::Validation(format!(
            "Age must be between {MIN_AGE} and {MAX_AGE}"
        )));
    }

    if !matches!(document.get(FAVORITE_FOODS), Some(Value::Array(_))) {
        return Err(AppError::Validation(
            "Favorite foods should be an array".to_string(),
        ));
    }

    if !matches!(document.get(RATINGS), Some(Value::Object(_))) {
        return Err(AppError::Validation(
            "Ratings should be an object".to_string(),
        ));
    }

    Ok(Survey { age, document })
}

pub async fn submit(
    store: &dyn SurveyStore,
    body: &[u8],
    current_year: i32,
) -> Result<SubmitResponse, AppError> {
    let survey = validate(body, current_year)?;

    info!(
        "Storing survey: age {}, {} favourite foods, {} ratings",
        survey.age(),
        survey.favorite_foods().len(),
        survey.ratings().map_or(0, Map::len)
    );

    store.insert_one(&survey.into_document()).await?;

    Ok(SubmitResponse { message: SUBMITTED })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{SUBMITTED, submit, validate};
    use crate::{
        database::{MemoryStore, SurveyStore},
        error::AppError,
    };

    const YEAR: i32 = 2026;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn survey(dob: &str) -> Value {
        json!({
            "fullNames": "Thandi Nkosi",
            "email": "thandi@example.com",
            "dob": dob,
            "contactNumber": "0821234567",
            "favoriteFoods": ["Pizza", "Pap and Wors"],
            "ratings": { "movies": "4", "radio": "2", "eatOut": "5", "tv": "3" }
        })
    }

    fn rejection(result: Result<impl std::fmt::Debug, AppError>) -> String {
        match result {
            Err(AppError::Validation(reason)) => reason,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_survey() {
        let survey = validate(&body(survey("1996-07-15")), YEAR).unwrap();

        assert_eq!(survey.age(), 30);
        assert_eq!(survey.favorite_foods().len(), 2);
        assert_eq!(survey.ratings().unwrap().len(), 4);
        assert_eq!(survey.into_document()["email"], "thandi@example.com");
    }

    #[test]
    fn test_age_boundaries() {
        assert_eq!(validate(&body(survey("2021-01-01")), YEAR).unwrap().age(), 5);
        assert_eq!(validate(&body(survey("1906-12-31")), YEAR).unwrap().age(), 120);

        assert_eq!(
            rejection(validate(&body(survey("2022-01-01")), YEAR)),
            "Age must be between 5 and 120"
        );
        assert_eq!(
            rejection(validate(&body(survey("1905-06-01")), YEAR)),
            "Age must be between 5 and 120"
        );
    }

    #[test]
    fn test_dob_surfaces_parse_error() {
        let reason = rejection(validate(&body(survey("15/07/1996")), YEAR));
        assert_eq!(
            reason,
            "time data '15/07/1996' does not match format '%Y-%m-%d'"
        );

        // leading year is fine but the date is not
        assert!(validate(&body(survey("1996-07-15x")), YEAR).is_err());
        assert!(validate(&body(survey("1996-02-30")), YEAR).is_err());
    }

    #[test]
    fn test_missing_dob() {
        let mut value = survey("1996-07-15");
        value.as_object_mut().unwrap().remove("dob");

        assert_eq!(
            rejection(validate(&body(value), YEAR)),
            "Date of birth is required"
        );
        assert_eq!(
            rejection(validate(&body(json!({ "dob": 1996 })), YEAR)),
            "Date of birth is required"
        );
    }

    #[test]
    fn test_favorite_foods_must_be_array() {
        for foods in [json!("Pizza"), json!({ "0": "Pizza" }), json!(null)] {
            let mut value = survey("1996-07-15");
            value["favoriteFoods"] = foods;

            assert_eq!(
                rejection(validate(&body(value), YEAR)),
                "Favorite foods should be an array"
            );
        }

        let mut value = survey("1996-07-15");
        value.as_object_mut().unwrap().remove("favoriteFoods");
        assert_eq!(
            rejection(validate(&body(value), YEAR)),
            "Favorite foods should be an array"
        );
    }

    #[test]
    fn test_age_checked_before_foods() {
        let value = json!({ "dob": "2025-01-01", "favoriteFoods": "Pizza" });

        assert_eq!(
            rejection(validate(&body(value), YEAR)),
            "Age must be between 5 and 120"
        );
    }

    #[test]
    fn test_ratings_must_be_object() {
        let mut value = survey("1996-07-15");
        value["ratings"] = json!([4, 2]);

        assert_eq!(
            rejection(validate(&body(value), YEAR)),
            "Ratings should be an object"
        );
    }

    #[test]
    fn test_partial_ratings_accepted() {
        let mut value = survey("1996-07-15");
        value["ratings"] = json!({ "tv": 1 });

        assert!(validate(&body(value), YEAR).is_ok());
    }

    #[test]
    fn test_body_must_be_object() {
        assert_eq!(
            rejection(validate(&body(json!(["1996-07-15"])), YEAR)),
            "Survey should be a JSON object"
        );
        assert!(matches!(
            validate(b"{not json", YEAR),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_stores_document_verbatim() {
        let store = MemoryStore::new();
        let mut value = survey("1996-07-15");
        value["referrer"] = json!({ "campaign": "staff-newsletter", "week": 42 });

        let response = submit(&store, &body(value.clone()), YEAR).await.unwrap();

        assert_eq!(response.message, SUBMITTED);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_all().await.unwrap(), vec![value]);
    }

    #[tokio::test]
    async fn test_submit_keeps_key_order_and_floats() {
        let store = MemoryStore::new();
        let raw = concat!(
            r#"{"zeta":1,"dob":"1996-07-15","alpha":2,"favoriteFoods":[],"#,
            r#""ratings":{"tv":2,"eatOut":"5"},"score":1.0715660391465826e-75,"weight":0.1}"#
        );

        submit(&store, raw.as_bytes(), YEAR).await.unwrap();

        let stored = store.find_all().await.unwrap();
        assert_eq!(serde_json::to_string(&stored[0]).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_rejected_submit_stores_nothing() {
        let store = MemoryStore::new();

        assert!(submit(&store, &body(survey("2024-01-01")), YEAR).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
