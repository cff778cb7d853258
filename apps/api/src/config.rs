use std::str::FromStr;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub jobspy_url: String,
    pub embedding_url: String,
    pub port: u16,
    pub rust_log: String,
    pub cors_origins: Vec<String>,
    pub job_sites: Vec<String>,
    pub results_wanted: u32,
    pub scrape_timeout_secs: u64,
    pub similarity_threshold: f64,
    pub gemini_rating_threshold: u8,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let similarity_threshold = parse_env("SIMILARITY_THRESHOLD", 0.45)?;
        let gemini_rating_threshold = parse_env("GEMINI_RATING_THRESHOLD", 7)?;
        validate_thresholds(similarity_threshold, gemini_rating_threshold)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            jobspy_url: env_or("JOBSPY_URL", "http://localhost:8000"),
            embedding_url: env_or("EMBEDDING_URL", "http://localhost:8081"),
            port: parse_env("PORT", 5001)?,
            rust_log: env_or("RUST_LOG", "info"),
            cors_origins: split_list(&env_or(
                "CORS_ORIGINS",
                "http://localhost:5173,http://localhost:5174",
            )),
            job_sites: split_list(&env_or("JOB_SITES", "linkedin,indeed")),
            results_wanted: parse_env("RESULTS_WANTED", 30)?,
            scrape_timeout_secs: parse_env("SCRAPE_TIMEOUT_SECS", 60)?,
            similarity_threshold,
            gemini_rating_threshold,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Similarity is a cosine, so the threshold must lie in [-1, 1]; ratings run 1-10.
fn validate_thresholds(similarity: f64, rating: u8) -> Result<()> {
    ensure!(
        similarity.is_finite() && (-1.0..=1.0).contains(&similarity),
        "SIMILARITY_THRESHOLD must be a number between -1 and 1, got {similarity}"
    );
    ensure!(
        (1..=10).contains(&rating),
        "GEMINI_RATING_THRESHOLD must be between 1 and 10, got {rating}"
    );
    Ok(())
}

/// Splits a comma-separated env value, dropping empty items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
