use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if the generation credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub llm_timeout_secs: u64,
    /// Total attempts per remote call. 1 disables retries.
    pub llm_max_attempts: u32,
    pub session_idle_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_API_BASE.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            session_idle_minutes: parse_env("SESSION_IDLE_MINUTES", 60)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
