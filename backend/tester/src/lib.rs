//! # Survey Tester
//!
//! Fills a running server with generated surveys, then prints what
//! `/api/results` makes of them.
//!
//! Generated surveys look like what the web form posts: every field filled,
//! ratings sent as strings, at least one favourite food.
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde_json::Value;

pub mod utils;

use utils::{random_survey, this_year};

pub const SUBMIT_PATH: &str = "/api/submit";
pub const RESULTS_PATH: &str = "/api/results";

pub async fn seed_surveys(base_url: &str, count: u32) -> Result<()> {
    let base_url = base_url.trim_end_matches('/');
    let client = Client::new();
    let mut rng = rand::thread_rng();
    let year = this_year();

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut accepted = 0;
    let mut rejected = 0;

    for _ in 0..count {
        let survey = random_survey(&mut rng, year);
        pb.set_message(format!("Submitting {}", survey["dob"]));

        let res = client
            .post(format!("{base_url}{SUBMIT_PATH}"))
            .json(&survey)
            .send()
            .await?;

        if res.status().is_success() {
            accepted += 1;
        } else {
            rejected += 1;
            pb.println(format!("Rejected ({}): {}", res.status(), res.text().await?));
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!("\nAccepted: {accepted}");
    println!("Rejected: {rejected}\n");

    let results: Value = client
        .get(format!("{base_url}{RESULTS_PATH}"))
        .send()
        .await?
        .json()
        .await?;

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
