//! Suggestion engine — turns the accumulated profile into per-field prompts,
//! submits them to the model collaborator, and parses the reply into a
//! numeric suggestion.
//!
//! Every failure mode (transport, auth, missing marker) converts into a
//! displayable error-text suggestion so the wizard step always renders; a
//! manual value is always still accepted.

pub mod parse;
pub mod prompts;

pub use parse::parse_final_amount;

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::WizardError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::wizard::profile::BusinessProfile;

/// The profile fields a suggestion can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionField {
    PriceRange,
    CostOfGoods,
    OverheadCosts,
    StartupCosts,
    MarketingBudget,
    SalesVolume,
    TimeHorizon,
}

impl SuggestionField {
    pub const ALL: [SuggestionField; 7] = [
        Self::PriceRange,
        Self::CostOfGoods,
        Self::OverheadCosts,
        Self::StartupCosts,
        Self::MarketingBudget,
        Self::SalesVolume,
        Self::TimeHorizon,
    ];

    /// The profile field name, as used in forms and the suggestion cache.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceRange => "price_range",
            Self::CostOfGoods => "cost_of_goods",
            Self::OverheadCosts => "overhead_costs",
            Self::StartupCosts => "startup_costs",
            Self::MarketingBudget => "marketing_budget",
            Self::SalesVolume => "sales_volume",
            Self::TimeHorizon => "time_horizon",
        }
    }
}

impl std::fmt::Display for SuggestionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionField {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| WizardError::InvalidField(s.to_string()))
    }
}

/// A suggestion for one field: the display text plus, when the reply carried
/// the `FINAL SUGGESTION: $` marker, the parsed amount for auto-fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub amount: Option<Decimal>,
}

impl Suggestion {
    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            amount: None,
        }
    }
}

/// Events delivered on the streaming path.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionEvent {
    /// An incremental chunk of reply text.
    Chunk { content: String },
    /// Stream finished; carries the full suggestion with the parsed amount.
    /// Always the last event.
    Done { suggestion: Suggestion },
}

/// Builds prompts, calls the model, parses replies.
pub struct SuggestionEngine {
    llm: Arc<dyn LlmProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl SuggestionEngine {
    pub fn new(llm: Arc<dyn LlmProvider>, config: &AppConfig) -> Self {
        Self {
            llm,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn request(&self, field: SuggestionField, profile: &BusinessProfile) -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system(prompts::system_prompt()),
            ChatMessage::user(prompts::field_prompt(field, profile)),
        ])
        .with_max_tokens(self.max_tokens)
        .with_temperature(self.temperature)
    }

    /// Request a suggestion, returning a complete reply.
    pub async fn suggest(&self, field: SuggestionField, profile: &BusinessProfile) -> Suggestion {
        info!(field = %field, model = self.llm.model_name(), "Requesting suggestion");

        let response = match self.llm.complete(self.request(field, profile)).await {
            Ok(r) => r,
            Err(e) => {
                warn!(field = %field, error = %e, "Suggestion request failed");
                return Suggestion::error(format!("Error getting AI suggestion: {e}"));
            }
        };

        finish(field, response.content)
    }

    /// Request a suggestion, streaming reply chunks as they arrive.
    ///
    /// The receiver yields `Chunk` events followed by exactly one `Done`.
    /// Final-suggestion parsing only happens once streaming completes.
    /// Collaborator failures become a `Done` carrying an error-text
    /// suggestion, same as the buffered path.
    pub async fn suggest_stream(
        &self,
        field: SuggestionField,
        profile: &BusinessProfile,
    ) -> mpsc::Receiver<SuggestionEvent> {
        use futures::StreamExt;

        info!(field = %field, model = self.llm.model_name(), "Requesting streamed suggestion");
        let (tx, rx) = mpsc::channel(64);

        let stream = self.llm.complete_stream(self.request(field, profile)).await;
        tokio::spawn(async move {
            let mut stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!(field = %field, error = %e, "Streamed suggestion request failed");
                    let _ = tx
                        .send(SuggestionEvent::Done {
                            suggestion: Suggestion::error(format!(
                                "Error getting AI suggestion: {e}"
                            )),
                        })
                        .await;
                    return;
                }
            };

            let mut full_text = String::new();
            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(content) => {
                        full_text.push_str(&content);
                        if tx.send(SuggestionEvent::Chunk { content }).await.is_err() {
                            return; // consumer went away
                        }
                    }
                    Err(e) => {
                        warn!(field = %field, error = %e, "Suggestion stream failed mid-flight");
                        let _ = tx
                            .send(SuggestionEvent::Done {
                                suggestion: Suggestion::error(format!(
                                    "Error getting AI suggestion: {e}"
                                )),
                            })
                            .await;
                        return;
                    }
                }
            }

            let _ = tx
                .send(SuggestionEvent::Done {
                    suggestion: finish(field, full_text),
                })
                .await;
        });

        rx
    }
}

/// Apply the final-suggestion contract to a complete reply.
fn finish(field: SuggestionField, text: String) -> Suggestion {
    match parse_final_amount(&text) {
        Some(amount) => {
            info!(field = %field, amount = %amount, "Parsed suggestion amount");
            Suggestion {
                text,
                amount: Some(amount),
            }
        }
        None => {
            warn!(field = %field, reply = %text, "Reply missing FINAL SUGGESTION marker");
            Suggestion::error(
                "Error: the AI response did not include a final suggestion amount. \
                 Please try again or enter a value manually.",
            )
        }
    }
}
