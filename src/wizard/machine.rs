//! Step submission handling — validation, storage, advancement, and
//! suggestion delegation.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::profile::BusinessProfile;
use super::step::WizardStep;
use crate::error::WizardError;
use crate::suggest::{Suggestion, SuggestionEngine, SuggestionField};

/// Form key that marks a submission as a suggestion request rather than a
/// value submission.
pub const GET_SUGGESTION_KEY: &str = "get_suggestion";
/// Form key selecting which field a step-6 suggestion request targets.
pub const FIELD_KEY: &str = "field";

/// What happened to a step submission.
#[derive(Debug)]
pub enum StepOutcome {
    /// Prerequisite unmet — silently navigate back to the named step.
    Redirect(WizardStep),
    /// Value accepted and stored; move to the next step.
    Advance(WizardStep),
    /// Validation failed — re-render the same step with a field-level
    /// message. No state changed.
    Invalid {
        field: &'static str,
        message: String,
    },
    /// A suggestion was produced (and cached); the step does not advance.
    Suggestion {
        field: SuggestionField,
        suggestion: Suggestion,
    },
}

/// Drives the wizard: guards step entry, validates submissions, mutates the
/// profile, and delegates suggestion requests to the engine.
pub struct WizardMachine {
    engine: Arc<SuggestionEngine>,
}

impl WizardMachine {
    pub fn new(engine: Arc<SuggestionEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    /// Entry guard for viewing a step. None means the step may render.
    pub fn guard(&self, step: WizardStep, profile: &BusinessProfile) -> Option<WizardStep> {
        let target = step.redirect_target(profile);
        if let Some(target) = target {
            debug!(attempted = %step, redirect = %target, "Prerequisite unmet");
        }
        target
    }

    /// Handle a POST to a step.
    ///
    /// Sequence violations and validation failures come back as outcomes
    /// (they recover locally); only an unrecognized suggestion field is a
    /// real error.
    pub async fn handle_submit(
        &self,
        step: WizardStep,
        form: &HashMap<String, String>,
        profile: &mut BusinessProfile,
    ) -> Result<StepOutcome, WizardError> {
        if let Some(target) = self.guard(step, profile) {
            return Ok(StepOutcome::Redirect(target));
        }

        if form.contains_key(GET_SUGGESTION_KEY) {
            let field = suggestion_field(step, form)?;
            let suggestion = self.engine.suggest(field, profile).await;
            profile.cache_suggestion(field.as_str(), &suggestion.text);
            return Ok(StepOutcome::Suggestion { field, suggestion });
        }

        let outcome = match step {
            WizardStep::Step1 => submit_step1(form, profile),
            WizardStep::Step2 => submit_step2(form, profile),
            WizardStep::Step3 => {
                submit_money(step, form, profile, "price_range", |p, v| p.price_range = v)
            }
            WizardStep::Step4 => {
                submit_money(step, form, profile, "cost_of_goods", |p, v| p.cost_of_goods = v)
            }
            WizardStep::Step5 => {
                submit_money(step, form, profile, "overhead_costs", |p, v| {
                    p.overhead_costs = v
                })
            }
            WizardStep::Step6 => submit_step6(form, profile),
            // Summary takes no submissions; send the client back to it.
            WizardStep::Summary => StepOutcome::Redirect(WizardStep::Summary),
        };

        if let StepOutcome::Advance(next) = &outcome {
            info!(step = %step, next = %next, "Step completed");
        }
        Ok(outcome)
    }
}

/// Which field a suggestion request on this step targets.
///
/// Steps 3–5 collect a single field; step 6 names one of its four fields via
/// the `field` form key. Text steps have nothing to suggest.
fn suggestion_field(
    step: WizardStep,
    form: &HashMap<String, String>,
) -> Result<SuggestionField, WizardError> {
    match step {
        WizardStep::Step3 => Ok(SuggestionField::PriceRange),
        WizardStep::Step4 => Ok(SuggestionField::CostOfGoods),
        WizardStep::Step5 => Ok(SuggestionField::OverheadCosts),
        WizardStep::Step6 => form
            .get(FIELD_KEY)
            .ok_or_else(|| WizardError::InvalidField("(no field specified)".to_string()))?
            .parse(),
        WizardStep::Step1 => Err(WizardError::InvalidField("product_description".to_string())),
        WizardStep::Step2 => Err(WizardError::InvalidField("target_audience".to_string())),
        WizardStep::Summary => Err(WizardError::InvalidField("(summary)".to_string())),
    }
}

fn submit_step1(form: &HashMap<String, String>, profile: &mut BusinessProfile) -> StepOutcome {
    let Some(description) = non_empty(form, "product_description") else {
        return StepOutcome::Invalid {
            field: "product_description",
            message: "Please provide a product description".to_string(),
        };
    };
    profile.product_description = description;
    StepOutcome::Advance(WizardStep::Step2)
}

fn submit_step2(form: &HashMap<String, String>, profile: &mut BusinessProfile) -> StepOutcome {
    let audience = non_empty(form, "target_audience");
    let location = non_empty(form, "location");
    let (Some(audience), Some(location)) = (audience, location) else {
        return StepOutcome::Invalid {
            field: if form.get("target_audience").map(|v| v.trim().is_empty()).unwrap_or(true) {
                "target_audience"
            } else {
                "location"
            },
            message: "Please fill in all fields".to_string(),
        };
    };
    profile.target_audience = audience;
    profile.location = location;
    StepOutcome::Advance(WizardStep::Step3)
}

fn submit_money(
    step: WizardStep,
    form: &HashMap<String, String>,
    profile: &mut BusinessProfile,
    field: &'static str,
    store: impl FnOnce(&mut BusinessProfile, Decimal),
) -> StepOutcome {
    match parse_money(form, field) {
        Ok(value) => {
            store(profile, value);
            StepOutcome::Advance(step.next().expect("money steps are never terminal"))
        }
        Err(message) => StepOutcome::Invalid { field, message },
    }
}

fn submit_step6(form: &HashMap<String, String>, profile: &mut BusinessProfile) -> StepOutcome {
    let startup = match parse_money(form, "startup_costs") {
        Ok(v) => v,
        Err(message) => {
            return StepOutcome::Invalid {
                field: "startup_costs",
                message,
            };
        }
    };
    let marketing = match parse_money(form, "marketing_budget") {
        Ok(v) => v,
        Err(message) => {
            return StepOutcome::Invalid {
                field: "marketing_budget",
                message,
            };
        }
    };
    let volume = match parse_count(form, "sales_volume") {
        Ok(v) => v,
        Err(message) => {
            return StepOutcome::Invalid {
                field: "sales_volume",
                message,
            };
        }
    };
    let horizon = match parse_count(form, "time_horizon") {
        Ok(v) => v,
        Err(message) => {
            return StepOutcome::Invalid {
                field: "time_horizon",
                message,
            };
        }
    };

    profile.startup_costs = startup;
    profile.marketing_budget = marketing;
    profile.sales_volume = volume;
    profile.time_horizon = horizon;
    StepOutcome::Advance(WizardStep::Summary)
}

fn non_empty(form: &HashMap<String, String>, key: &str) -> Option<String> {
    form.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_money(form: &HashMap<String, String>, field: &str) -> Result<Decimal, String> {
    let raw = form
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Please provide a value for {field}"))?;
    // Tolerate "$1,234.56" — the suggestion UI offers amounts in that shape.
    let cleaned = raw.trim_start_matches('$').replace(',', "");
    let value: Decimal = cleaned
        .parse()
        .map_err(|_| format!("{field} must be a number"))?;
    if value < Decimal::ZERO {
        return Err(format!("{field} cannot be negative"));
    }
    Ok(value)
}

fn parse_count(form: &HashMap<String, String>, field: &str) -> Result<u32, String> {
    let raw = form
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Please provide a value for {field}"))?;
    raw.replace(',', "")
        .parse()
        .map_err(|_| format!("{field} must be a whole number"))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::AppConfig;
    use crate::error::LlmError;
    use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider, TextStream};

    struct FixedProvider(String);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn model_name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: self.0.clone(),
                input_tokens: 0,
                output_tokens: 0,
            })
        }

        async fn complete_stream(
            &self,
            _request: CompletionRequest,
        ) -> Result<TextStream, LlmError> {
            let content = self.0.clone();
            Ok(Box::pin(futures::stream::once(async move { Ok(content) })))
        }
    }

    fn machine(reply: &str) -> WizardMachine {
        let engine = SuggestionEngine::new(
            Arc::new(FixedProvider(reply.to_string())),
            &AppConfig::default(),
        );
        WizardMachine::new(Arc::new(engine))
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn profile_through_step5() -> BusinessProfile {
        BusinessProfile {
            product_description: "hand-poured candles".to_string(),
            target_audience: "gift shoppers".to_string(),
            location: "Portland".to_string(),
            price_range: dec!(20),
            cost_of_goods: dec!(12),
            overhead_costs: dec!(800),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn full_walk_through_all_steps() {
        let machine = machine("FINAL SUGGESTION: $1.00");
        let mut profile = BusinessProfile::new();

        let submissions: [(WizardStep, HashMap<String, String>, WizardStep); 6] = [
            (
                WizardStep::Step1,
                form(&[("product_description", "hand-poured candles")]),
                WizardStep::Step2,
            ),
            (
                WizardStep::Step2,
                form(&[("target_audience", "gift shoppers"), ("location", "Portland")]),
                WizardStep::Step3,
            ),
            (
                WizardStep::Step3,
                form(&[("price_range", "20")]),
                WizardStep::Step4,
            ),
            (
                WizardStep::Step4,
                form(&[("cost_of_goods", "12")]),
                WizardStep::Step5,
            ),
            (
                WizardStep::Step5,
                form(&[("overhead_costs", "800")]),
                WizardStep::Step6,
            ),
            (
                WizardStep::Step6,
                form(&[
                    ("startup_costs", "2400"),
                    ("marketing_budget", "200"),
                    ("sales_volume", "100"),
                    ("time_horizon", "12"),
                ]),
                WizardStep::Summary,
            ),
        ];

        for (step, submitted, expected_next) in submissions {
            let outcome = machine
                .handle_submit(step, &submitted, &mut profile)
                .await
                .unwrap();
            match outcome {
                StepOutcome::Advance(next) => assert_eq!(next, expected_next),
                other => panic!("{step}: expected advance, got {other:?}"),
            }
        }

        assert_eq!(profile.price_range, dec!(20));
        assert_eq!(profile.startup_costs, dec!(2400));
        assert_eq!(profile.sales_volume, 100);
        assert_eq!(profile.time_horizon, 12);
    }

    #[tokio::test]
    async fn submit_out_of_order_redirects_to_first_gap() {
        let machine = machine("irrelevant");
        let mut profile = BusinessProfile::new();
        let outcome = machine
            .handle_submit(
                WizardStep::Step4,
                &form(&[("cost_of_goods", "12")]),
                &mut profile,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Redirect(WizardStep::Step1)));
        // Nothing was stored.
        assert_eq!(profile, BusinessProfile::new());
    }

    #[tokio::test]
    async fn missing_description_is_invalid() {
        let machine = machine("irrelevant");
        let mut profile = BusinessProfile::new();
        let outcome = machine
            .handle_submit(WizardStep::Step1, &form(&[]), &mut profile)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            StepOutcome::Invalid {
                field: "product_description",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unparseable_price_is_invalid_not_a_crash() {
        let machine = machine("irrelevant");
        let mut profile = profile_through_step5();
        profile.price_range = Decimal::ZERO;
        profile.cost_of_goods = Decimal::ZERO;
        profile.overhead_costs = Decimal::ZERO;

        let outcome = machine
            .handle_submit(
                WizardStep::Step3,
                &form(&[("price_range", "twenty")]),
                &mut profile,
            )
            .await
            .unwrap();
        match outcome {
            StepOutcome::Invalid { field, message } => {
                assert_eq!(field, "price_range");
                assert!(message.contains("must be a number"));
            }
            other => panic!("expected invalid, got {other:?}"),
        }
        assert_eq!(profile.price_range, Decimal::ZERO);
    }

    #[tokio::test]
    async fn negative_money_is_rejected() {
        let machine = machine("irrelevant");
        let mut profile = profile_through_step5();
        let outcome = machine
            .handle_submit(
                WizardStep::Step6,
                &form(&[
                    ("startup_costs", "-5"),
                    ("marketing_budget", "0"),
                    ("sales_volume", "10"),
                    ("time_horizon", "6"),
                ]),
                &mut profile,
            )
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            StepOutcome::Invalid {
                field: "startup_costs",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn dollar_formatted_input_is_accepted() {
        let machine = machine("irrelevant");
        let mut profile = profile_through_step5();
        profile.price_range = Decimal::ZERO;
        profile.cost_of_goods = Decimal::ZERO;
        profile.overhead_costs = Decimal::ZERO;

        let outcome = machine
            .handle_submit(
                WizardStep::Step3,
                &form(&[("price_range", "$1,250.50")]),
                &mut profile,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Advance(WizardStep::Step4)));
        assert_eq!(profile.price_range, dec!(1250.50));
    }

    #[tokio::test]
    async fn suggestion_request_caches_and_does_not_advance() {
        let machine = machine("Analysis.\nFINAL SUGGESTION: $25.00");
        let mut profile = profile_through_step5();
        profile.price_range = Decimal::ZERO;
        profile.cost_of_goods = Decimal::ZERO;
        profile.overhead_costs = Decimal::ZERO;

        let outcome = machine
            .handle_submit(
                WizardStep::Step3,
                &form(&[(GET_SUGGESTION_KEY, "1")]),
                &mut profile,
            )
            .await
            .unwrap();

        match outcome {
            StepOutcome::Suggestion { field, suggestion } => {
                assert_eq!(field, SuggestionField::PriceRange);
                assert_eq!(suggestion.amount, Some(dec!(25)));
            }
            other => panic!("expected suggestion, got {other:?}"),
        }
        assert!(profile.cached_suggestion("price_range").is_some());
        // Profile value untouched — suggestion requests never advance.
        assert_eq!(profile.price_range, Decimal::ZERO);
    }

    #[tokio::test]
    async fn step6_suggestion_requires_valid_field() {
        let machine = machine("FINAL SUGGESTION: $100.00");
        let mut profile = profile_through_step5();

        let err = machine
            .handle_submit(
                WizardStep::Step6,
                &form(&[(GET_SUGGESTION_KEY, "1"), (FIELD_KEY, "revenue")]),
                &mut profile,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidField(f) if f == "revenue"));

        let err = machine
            .handle_submit(
                WizardStep::Step6,
                &form(&[(GET_SUGGESTION_KEY, "1")]),
                &mut profile,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidField(_)));
    }

    #[tokio::test]
    async fn step6_suggestion_by_field_name() {
        let machine = machine("Breakdown.\nFINAL SUGGESTION: $5,000.00");
        let mut profile = profile_through_step5();

        let outcome = machine
            .handle_submit(
                WizardStep::Step6,
                &form(&[(GET_SUGGESTION_KEY, "1"), (FIELD_KEY, "startup_costs")]),
                &mut profile,
            )
            .await
            .unwrap();
        match outcome {
            StepOutcome::Suggestion { field, suggestion } => {
                assert_eq!(field, SuggestionField::StartupCosts);
                assert_eq!(suggestion.amount, Some(dec!(5000)));
            }
            other => panic!("expected suggestion, got {other:?}"),
        }
    }
}
