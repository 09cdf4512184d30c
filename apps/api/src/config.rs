use anyhow::{Context, Result};

/// Default Gemini model. Overridable via GEMINI_MODEL so deployments can
/// move between flash/pro tiers without a rebuild.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TOP_P: f32 = 0.95;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 25;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub model: ModelConfig,
    /// Deadline for a single capability call. Expiry surfaces as a timeout
    /// error to the user, never a crash.
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

/// Generation parameters for the capability call. One struct instead of the
/// per-deployment hardcoded variants; everything here is env-overridable.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_name: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            model: ModelConfig {
                model_name: std::env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                max_output_tokens: parse_env("GEMINI_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?,
                temperature: parse_env("GEMINI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                top_p: parse_env("GEMINI_TOP_P", DEFAULT_TOP_P)?,
            },
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid value")),
        Err(_) => Ok(default),
    }
}
