use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub survey_key: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            survey_key: try_load("SURVEY_KEY", "survey_db:surveys")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .map_err(|_| {
            warn!("Environment variable {key} not found, using default");
        })
        .ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::parse_value;

    #[test]
    fn test_port_parses() {
        let port: u16 = parse_value("RUST_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_bad_port_names_variable() {
        let err = parse_value::<u16>("RUST_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("RUST_PORT"));
    }

    #[test]
    fn test_out_of_range_port() {
        assert!(parse_value::<u16>("RUST_PORT", "70000").is_err());
    }
}
