//! Error types for the break-even planner.
//!
//! Validation failures and step-sequence gaps are not errors here: the step
//! handlers recover locally (re-render / redirect), so those conditions live
//! as `StepOutcome` variants in the wizard module.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Wizard-level errors. The one client-facing failure: a suggestion request
/// naming a field that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Unknown suggestion field: {0}")]
    InvalidField(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Request to provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session store backend error: {0}")]
    Backend(String),
}
