use chrono::{Datelike, Local, NaiveDate};
use rand::{Rng, seq::SliceRandom};
use serde_json::{Value, json};

pub const KNOWN_FOODS: [&str; 3] = ["Pizza", "Pasta", "Pap and Wors"];
pub const OTHER_FOODS: [&str; 3] = ["Chicken stir fry", "Beef stew", "Bunny chow"];
pub const RATING_CATEGORIES: [&str; 4] = ["movies", "radio", "eatOut", "tv"];

const FIRST_NAMES: [&str; 6] = ["Thandi", "Sipho", "Lerato", "Johan", "Ayesha", "Musa"];
const SURNAMES: [&str; 6] = ["Nkosi", "Dlamini", "van Wyk", "Naidoo", "Mokoena", "Botha"];

pub fn this_year() -> i32 {
    Local::now().year()
}

/// Date of birth whose calendar-year age falls within 5..=120.
pub fn random_dob<R: Rng>(rng: &mut R, current_year: i32) -> String {
    let year = current_year - rng.gen_range(5..=120);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{year:04}-{month:02}-{day:02}"))
}

pub fn random_foods<R: Rng>(rng: &mut R) -> Vec<&'static str> {
    let mut foods: Vec<&str> = KNOWN_FOODS
        .iter()
        .copied()
        .filter(|_| rng.gen_bool(0.5))
        .collect();

    if rng.gen_bool(0.3) {
        if let Some(other) = OTHER_FOODS.choose(rng) {
            foods.push(*other);
        }
    }

    if foods.is_empty() {
        foods.push(KNOWN_FOODS[rng.gen_range(0..KNOWN_FOODS.len())]);
    }

    foods
}

pub fn random_survey<R: Rng>(rng: &mut R, current_year: i32) -> Value {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = SURNAMES[rng.gen_range(0..SURNAMES.len())];
    let handle = format!("{first}.{last}").to_lowercase().replace(' ', "");

    let mut ratings = serde_json::Map::new();
    for category in RATING_CATEGORIES {
        ratings.insert(
            category.to_string(),
            json!(rng.gen_range(1..=5).to_string()),
        );
    }

    json!({
        "fullNames": format!("{first} {last}"),
        "email": format!("{handle}@example.com"),
        "dob": random_dob(rng, current_year),
        "contactNumber": format!("0{}", rng.gen_range(600_000_000u32..=899_999_999)),
        "favoriteFoods": random_foods(rng),
        "ratings": ratings,
    })
}
