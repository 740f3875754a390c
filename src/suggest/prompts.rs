//! Prompt templates for per-field suggestions.
//!
//! Each field gets a structured, multi-factor prompt embedding whatever the
//! profile already knows. Every prompt ends with the same instruction so the
//! reply carries the parseable `FINAL SUGGESTION: $<amount>` marker.

use super::SuggestionField;
use crate::wizard::profile::BusinessProfile;

/// System prompt shared by every suggestion request.
pub fn system_prompt() -> &'static str {
    "You are a business analyst helping entrepreneurs estimate costs and metrics for their \
     business.\n\
     Always structure your response as follows:\n\
     1. A brief analysis of the relevant factors\n\
     2. A breakdown of components (if applicable)\n\
     3. End with 'FINAL SUGGESTION: $X,XXX.XX' on a new line, where X,XXX.XX is your final \
     suggested amount"
}

/// Build the user prompt for a field from the accumulated profile.
pub fn field_prompt(field: SuggestionField, profile: &BusinessProfile) -> String {
    let context = profile_context(field, profile);
    let ask = match field {
        SuggestionField::PriceRange => {
            "Suggest a good price point per unit for this product or service.\n\
             Consider:\n\
             - The target market's purchasing power\n\
             - Competitor pricing\n\
             - Perceived value\n\
             - Market positioning"
        }
        SuggestionField::CostOfGoods => {
            "Suggest the cost of goods per unit for manufacturing or acquiring this product.\n\
             Consider:\n\
             - Material costs\n\
             - Labor costs\n\
             - Manufacturing/production costs\n\
             - Industry standard margins"
        }
        SuggestionField::OverheadCosts => {
            "Suggest typical monthly overhead costs for this business.\n\
             Consider:\n\
             - Rent/lease costs in the stated location\n\
             - Utilities\n\
             - Insurance\n\
             - Employee salaries\n\
             - Administrative expenses"
        }
        SuggestionField::StartupCosts => {
            "Suggest reasonable one-time startup costs for this business.\n\
             Consider and break down:\n\
             - Initial inventory needs\n\
             - Required equipment and facilities\n\
             - Legal and registration fees\n\
             - Initial marketing/launch costs\n\
             - Security deposits\n\
             - Working capital needs"
        }
        SuggestionField::MarketingBudget => {
            "Suggest a realistic monthly marketing budget for this business.\n\
             Consider:\n\
             - Digital marketing and advertising channels\n\
             - Promotional activities\n\
             - What competitors at this price point typically spend"
        }
        SuggestionField::SalesVolume => {
            "Suggest a realistic monthly sales volume (number of units) for this business.\n\
             Consider:\n\
             - Market size and competition\n\
             - The price point\n\
             - Typical adoption for a new business\n\
             Treat the dollar amount in the final suggestion as the unit count."
        }
        SuggestionField::TimeHorizon => {
            "Suggest a realistic number of months for this business to reach break-even.\n\
             Consider:\n\
             - The startup costs and monthly expenses\n\
             - The expected sales ramp-up\n\
             Treat the dollar amount in the final suggestion as the number of months."
        }
    };

    format!(
        "Based on the following business details:\n{context}\n\n{ask}\n\n\
         Provide your analysis and end with FINAL SUGGESTION: $X,XXX.XX"
    )
}

/// The profile lines relevant to a field — only values set by earlier steps.
fn profile_context(field: SuggestionField, profile: &BusinessProfile) -> String {
    let mut lines = vec![format!(
        "- Product/Service: {}",
        profile.product_description
    )];
    if !profile.target_audience.is_empty() {
        lines.push(format!(
            "- Target Market: {} in {}",
            profile.target_audience, profile.location
        ));
    }

    // Numeric context accumulates with the step order: each field sees the
    // values collected before it.
    use SuggestionField::*;
    if !matches!(field, PriceRange) {
        lines.push(format!("- Price per Unit: ${}", profile.price_range));
    }
    if matches!(
        field,
        OverheadCosts | StartupCosts | MarketingBudget | SalesVolume | TimeHorizon
    ) {
        lines.push(format!("- Cost per Unit: ${}", profile.cost_of_goods));
    }
    if matches!(field, StartupCosts | MarketingBudget | SalesVolume | TimeHorizon) {
        lines.push(format!("- Monthly Overhead: ${}", profile.overhead_costs));
    }

    lines.join("\n")
}
