//! The accumulating business profile — one instance per session.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The record of everything the user has entered across wizard steps.
///
/// Created empty when a user first enters the wizard and mutated exclusively
/// by the step handler currently active. Re-entering the wizard root resets
/// it wholesale (the session's auth flag lives outside the profile and
/// survives).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub product_description: String,
    pub target_audience: String,
    pub location: String,
    pub price_range: Decimal,
    pub cost_of_goods: Decimal,
    pub overhead_costs: Decimal,
    pub startup_costs: Decimal,
    pub marketing_budget: Decimal,
    pub sales_volume: u32,
    pub time_horizon: u32,
    /// Write-only cache of the last suggestion text per field. Overwritten on
    /// re-request; never required for progression.
    #[serde(default)]
    pub ai_suggestions: HashMap<String, String>,
}

impl BusinessProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every field back to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Cache a suggestion for a field, replacing any earlier one.
    pub fn cache_suggestion(&mut self, field: &str, text: impl Into<String>) {
        self.ai_suggestions.insert(field.to_string(), text.into());
    }

    /// The cached suggestion for a field, if one was ever requested.
    pub fn cached_suggestion(&self, field: &str) -> Option<&str> {
        self.ai_suggestions.get(field).map(String::as_str)
    }
}
