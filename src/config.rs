//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Model identifier sent to the completion API.
    pub model: String,
    /// Base URL of the OpenAI-compatible completion API.
    pub api_base: String,
    /// API key for the completion API.
    pub api_key: SecretString,
    /// Bounded timeout for suggestion requests.
    pub suggestion_timeout: Duration,
    /// Max tokens per suggestion completion.
    pub max_tokens: u32,
    /// Sampling temperature for suggestions.
    pub temperature: f32,
    /// Months over which one-time startup costs are amortized into the
    /// break-even fixed-cost base.
    pub amortization_months: u32,
    /// Whether the monthly marketing budget joins the break-even fixed-cost
    /// base. The two historical variants of this product disagree; defaults
    /// to false (overhead + amortized startup only) pending product
    /// clarification. The summary's monthly-cost figure always includes
    /// marketing regardless of this flag.
    pub include_marketing_in_breakeven: bool,
    /// Access code gating the wizard. None disables the login gate.
    pub access_code: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: SecretString::from(""),
            suggestion_timeout: Duration::from_secs(30),
            max_tokens: 1000,
            temperature: 0.7,
            amortization_months: 12,
            include_marketing_in_breakeven: false,
            access_code: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let port = match std::env::var("BREAKEVEN_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BREAKEVEN_PORT".to_string(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => defaults.port,
        };

        let timeout_secs = match std::env::var("BREAKEVEN_SUGGESTION_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BREAKEVEN_SUGGESTION_TIMEOUT_SECS".to_string(),
                message: format!("not a number of seconds: {raw}"),
            })?,
            Err(_) => defaults.suggestion_timeout.as_secs(),
        };

        Ok(Self {
            port,
            model: std::env::var("BREAKEVEN_MODEL").unwrap_or(defaults.model),
            api_base: std::env::var("OPENAI_API_BASE").unwrap_or(defaults.api_base),
            api_key: SecretString::from(api_key),
            suggestion_timeout: Duration::from_secs(timeout_secs),
            include_marketing_in_breakeven: std::env::var("BREAKEVEN_INCLUDE_MARKETING")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.include_marketing_in_breakeven),
            access_code: std::env::var("BREAKEVEN_ACCESS_CODE")
                .ok()
                .filter(|c| !c.is_empty()),
            ..defaults
        })
    }
}
