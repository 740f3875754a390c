//! Summary metrics derived from a completed profile.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::wizard::profile::BusinessProfile;

/// Months of operating costs folded into the initial investment figure.
const INVESTMENT_RUNWAY_MONTHS: u32 = 3;

/// Derived financial metrics, computed on demand at summary time and never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryMetrics {
    pub contribution_margin: Decimal,
    pub monthly_revenue: Decimal,
    pub monthly_costs: Decimal,
    pub monthly_profit: Decimal,
    pub total_investment: Decimal,
    /// None when monthly profit is not positive — the investment is never
    /// recovered.
    pub months_to_breakeven: Option<Decimal>,
}

impl SummaryMetrics {
    /// Compute metrics from the profile.
    ///
    /// Monthly costs always include the marketing budget here; whether
    /// marketing also joins the break-even fixed base is a separate policy
    /// knob (see `AppConfig::include_marketing_in_breakeven`).
    pub fn compute(profile: &BusinessProfile) -> Self {
        let volume = Decimal::from(profile.sales_volume);
        let monthly_revenue = profile.price_range * volume;
        let monthly_costs =
            profile.cost_of_goods * volume + profile.overhead_costs + profile.marketing_budget;
        let monthly_profit = monthly_revenue - monthly_costs;
        let total_investment =
            profile.startup_costs + monthly_costs * Decimal::from(INVESTMENT_RUNWAY_MONTHS);

        let months_to_breakeven = if monthly_profit > Decimal::ZERO {
            Some((total_investment / monthly_profit).abs())
        } else {
            None
        };

        Self {
            contribution_margin: profile.price_range - profile.cost_of_goods,
            monthly_revenue,
            monthly_costs,
            monthly_profit,
            total_investment,
            months_to_breakeven,
        }
    }
}
