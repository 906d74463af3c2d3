use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::screening::scoring::ScoringWeights;
use crate::screening::ScreeningSettings;

const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: the chat credential may also arrive per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub llm_max_attempts: u32,
    pub screening: ScreeningSettings,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ScreeningSettings::default();
        let weights = ScoringWeights {
            embedding: parse_weight("SCORE_WEIGHT_EMBEDDING", defaults.weights.embedding)?,
            required: parse_weight("SCORE_WEIGHT_REQUIRED", defaults.weights.required)?,
            preferred: parse_weight("SCORE_WEIGHT_PREFERRED", defaults.weights.preferred)?,
            preferred_scale: parse_weight(
                "SCORE_PREFERRED_SCALE",
                defaults.weights.preferred_scale,
            )?,
        };

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_base_url: optional_env("EMBEDDING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_BASE_URL.to_string()),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1u32)?.max(1),
            screening: ScreeningSettings {
                weights,
                extract_max_chars: parse_env("EXTRACT_MAX_CHARS", defaults.extract_max_chars)?,
                embed_max_chars: parse_env("EMBED_MAX_CHARS", defaults.embed_max_chars)?,
                analysis_max_chars: parse_env("ANALYSIS_MAX_CHARS", defaults.analysis_max_chars)?,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable's value, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(key, optional_env(key).as_deref(), default)
}

fn parse_value<T>(key: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_weight(key: &str, default: f64) -> Result<f64> {
    weight_value(key, optional_env(key).as_deref(), default)
}

/// Score weights must be finite and non-negative.
fn weight_value(key: &str, raw: Option<&str>, default: f64) -> Result<f64> {
    let value: f64 = parse_value(key, raw, default)?;
    if !value.is_finite() || value < 0.0 {
        bail!("Environment variable '{key}' must be a finite, non-negative number, got '{value}'");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_uses_default_when_unset() {
        let port: u16 = parse_value("PORT", None, 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_parses_float() {
        let w: f64 = parse_value("SCORE_WEIGHT_EMBEDDING", Some("0.25"), 0.4).unwrap();
        assert!((w - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_value_error_names_variable() {
        let err = parse_value::<u16>("PORT", Some("eighty"), 8080).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_weight_value_accepts_zero_and_default() {
        assert_eq!(weight_value("SCORE_WEIGHT_EMBEDDING", Some("0"), 0.4).unwrap(), 0.0);
        assert_eq!(weight_value("SCORE_WEIGHT_EMBEDDING", None, 0.4).unwrap(), 0.4);
    }

    #[test]
    fn test_weight_value_rejects_nan_infinite_and_negative() {
        for raw in ["NaN", "inf", "-0.5"] {
            let err = weight_value("SCORE_WEIGHT_EMBEDDING", Some(raw), 0.4).unwrap_err();
            assert!(
                err.to_string().contains("SCORE_WEIGHT_EMBEDDING"),
                "unexpected error for {raw}: {err}"
            );
        }
    }
}
