use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use crate::assessment::service::MAX_QUESTIONS_PER_QUIZ;

/// Application configuration loaded from environment variables.
/// Everything but the numeric settings is optional: without `DATABASE_URL` the
/// service keeps profiles in memory, without `ANTHROPIC_API_KEY` quizzes come
/// from the mock generator and resume extraction is disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub role_benchmarks_path: Option<PathBuf>,
    pub quiz_question_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            role_benchmarks_path: None,
            quiz_question_count: 40,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: parse_env("PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            role_benchmarks_path: optional_env("ROLE_BENCHMARKS_PATH").map(PathBuf::from),
            quiz_question_count: parse_env("QUIZ_QUESTION_COUNT", defaults.quiz_question_count)
                .and_then(check_quiz_question_count)
                .with_context(|| {
                    format!("QUIZ_QUESTION_COUNT must be between 1 and {MAX_QUESTIONS_PER_QUIZ}")
                })?,
        })
    }
}

/// The default quiz size must itself be a size a quiz request may ask for.
fn check_quiz_question_count(count: usize) -> Result<usize> {
    ensure!(
        (1..=MAX_QUESTIONS_PER_QUIZ).contains(&count),
        "quiz question count {count} is out of range"
    );
    Ok(count)
}

/// Unset and blank variables both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}
