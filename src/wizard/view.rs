//! View-model construction.
//!
//! The core never renders markup: each handler builds a named mapping of
//! values (profile fields, errors, cached suggestions, computed metrics,
//! chart series) and hands it to the `ViewRenderer` collaborator.

use serde_json::{json, Value};

use super::profile::BusinessProfile;
use super::step::WizardStep;
use crate::config::AppConfig;
use crate::finance::{self, BreakEvenInputs, BreakEvenOutcome, SummaryMetrics};
use crate::suggest::SuggestionField;

/// The suggestible fields shown on a step.
pub fn suggestible_fields(step: WizardStep) -> &'static [SuggestionField] {
    match step {
        WizardStep::Step3 => &[SuggestionField::PriceRange],
        WizardStep::Step4 => &[SuggestionField::CostOfGoods],
        WizardStep::Step5 => &[SuggestionField::OverheadCosts],
        WizardStep::Step6 => &[
            SuggestionField::StartupCosts,
            SuggestionField::MarketingBudget,
            SuggestionField::SalesVolume,
            SuggestionField::TimeHorizon,
        ],
        WizardStep::Step1 | WizardStep::Step2 | WizardStep::Summary => &[],
    }
}

/// View model for an input step: stored values pre-fill the form, cached
/// suggestions ride along, and an optional field-level error is attached.
pub fn step_view(step: WizardStep, profile: &BusinessProfile, error: Option<&str>) -> Value {
    let suggestions: serde_json::Map<String, Value> = suggestible_fields(step)
        .iter()
        .filter_map(|field| {
            profile
                .cached_suggestion(field.as_str())
                .map(|text| (field.as_str().to_string(), Value::String(text.to_string())))
        })
        .collect();

    json!({
        "view": step.to_string(),
        "step_number": step.index(),
        "data": profile,
        "ai_suggestions": suggestions,
        "error": error,
    })
}

/// View model for the summary: the full profile plus everything the finance
/// engine derives from it. Recomputed on every view, never persisted.
pub fn summary_view(profile: &BusinessProfile, config: &AppConfig) -> Value {
    let mut fixed_costs = profile.overhead_costs;
    if config.include_marketing_in_breakeven {
        fixed_costs += profile.marketing_budget;
    }

    let analysis = finance::breakeven::analyze(&BreakEvenInputs {
        price: profile.price_range,
        variable_cost: profile.cost_of_goods,
        fixed_costs,
        startup_costs: profile.startup_costs,
        amortization_months: config.amortization_months,
    });
    let metrics = SummaryMetrics::compute(profile);

    let break_even_units = match &analysis.outcome {
        BreakEvenOutcome::Units { units } => json!(units),
        BreakEvenOutcome::NotComputable => Value::Null,
    };
    // Suppressed charts render as empty series rather than a missing key.
    let chart_data = match &analysis.chart {
        Some(chart) => json!(chart),
        None => json!({ "labels": [], "revenue": [], "costs": [] }),
    };

    json!({
        "view": "summary",
        "data": profile,
        "break_even_units": break_even_units,
        "break_even_message": analysis.message,
        "show_chart": analysis.show_chart(),
        "chart_data": chart_data,
        "metrics": metrics,
    })
}
