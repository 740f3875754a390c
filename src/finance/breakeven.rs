//! Break-even computation and chart series generation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Inputs to the break-even analysis.
#[derive(Debug, Clone)]
pub struct BreakEvenInputs {
    /// Selling price per unit.
    pub price: Decimal,
    /// Variable cost per unit (cost of goods).
    pub variable_cost: Decimal,
    /// Fixed monthly costs (overhead, plus marketing when the policy says so).
    pub fixed_costs: Decimal,
    /// One-time startup costs, amortized evenly into the fixed base.
    pub startup_costs: Decimal,
    /// Months over which startup costs are amortized.
    pub amortization_months: u32,
}

/// The computed break-even state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakEvenOutcome {
    /// Finite break-even point, in units per month.
    Units { units: Decimal },
    /// Price does not exceed variable cost; no volume ever breaks even.
    NotComputable,
}

/// Sampled revenue/cost curves for charting.
///
/// 11 evenly spaced unit counts from 0 to twice the break-even point, so the
/// crossing lands in the middle of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<i64>,
    pub revenue: Vec<Decimal>,
    pub costs: Vec<Decimal>,
}

/// Result of a break-even analysis.
#[derive(Debug, Clone, Serialize)]
pub struct BreakEvenAnalysis {
    pub outcome: BreakEvenOutcome,
    /// Human-readable explanation, always present.
    pub message: String,
    /// Chart data; None when the break-even point is undefined (a chart over
    /// an undefined crossing is meaningless).
    pub chart: Option<ChartSeries>,
}

impl BreakEvenAnalysis {
    pub fn show_chart(&self) -> bool {
        self.chart.is_some()
    }
}

/// Run the break-even analysis.
pub fn analyze(inputs: &BreakEvenInputs) -> BreakEvenAnalysis {
    if inputs.price <= inputs.variable_cost {
        tracing::debug!(
            price = %inputs.price,
            variable_cost = %inputs.variable_cost,
            "Break-even not computable"
        );
        return BreakEvenAnalysis {
            outcome: BreakEvenOutcome::NotComputable,
            message: "Cannot calculate break-even point: price per unit must be greater than \
                      the variable cost per unit."
                .to_string(),
            chart: None,
        };
    }

    let contribution_margin = inputs.price - inputs.variable_cost;
    let amortized_fixed = inputs.fixed_costs + amortized_startup(inputs);
    let units = amortized_fixed / contribution_margin;

    let message = format!(
        "You need to sell {} units per month to break even (startup costs amortized over {} \
         months).",
        units.round_dp(2),
        inputs.amortization_months
    );

    BreakEvenAnalysis {
        outcome: BreakEvenOutcome::Units { units },
        message,
        chart: Some(chart_series(units, inputs.price, inputs.variable_cost, amortized_fixed)),
    }
}

fn amortized_startup(inputs: &BreakEvenInputs) -> Decimal {
    if inputs.amortization_months == 0 {
        return Decimal::ZERO;
    }
    inputs.startup_costs / Decimal::from(inputs.amortization_months)
}

/// Sample the revenue and cost lines at 11 points across 0..2×break-even.
///
/// Unit counts are floored to integers: `step = floor(2 × units) / 10` with
/// integer division, matching the labels a unit-count axis wants.
fn chart_series(
    break_even_units: Decimal,
    price: Decimal,
    variable_cost: Decimal,
    amortized_fixed: Decimal,
) -> ChartSeries {
    let max_units = (break_even_units * Decimal::TWO).floor().to_i64().unwrap_or(0);
    let step = max_units / 10;

    let labels: Vec<i64> = (0..=10).map(|i| i * step).collect();
    let revenue = labels.iter().map(|&u| Decimal::from(u) * price).collect();
    let costs = labels
        .iter()
        .map(|&u| Decimal::from(u) * variable_cost + amortized_fixed)
        .collect();

    ChartSeries {
        labels,
        revenue,
        costs,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn inputs(price: Decimal, variable: Decimal, fixed: Decimal, startup: Decimal) -> BreakEvenInputs {
        BreakEvenInputs {
            price,
            variable_cost: variable,
            fixed_costs: fixed,
            startup_costs: startup,
            amortization_months: 12,
        }
    }

    #[test]
    fn amortized_scenario() {
        // margin 8, amortized fixed 800 + 2400/12 = 1000, break-even 125
        let analysis = analyze(&inputs(dec!(20), dec!(12), dec!(800), dec!(2400)));
        assert_eq!(
            analysis.outcome,
            BreakEvenOutcome::Units { units: dec!(125) }
        );
        assert!(analysis.show_chart());

        let chart = analysis.chart.unwrap();
        assert_eq!(chart.labels.len(), 11);
        assert_eq!(chart.labels.first(), Some(&0));
        assert_eq!(chart.labels.last(), Some(&250));
        assert_eq!(chart.labels[1], 25);
    }

    #[test]
    fn curves_cross_at_break_even() {
        let analysis = analyze(&inputs(dec!(20), dec!(12), dec!(800), dec!(2400)));
        let chart = analysis.chart.unwrap();

        // Below the crossing costs exceed revenue; above, revenue wins.
        for (i, &units) in chart.labels.iter().enumerate() {
            if units < 125 {
                assert!(chart.costs[i] > chart.revenue[i], "at {units} units");
            } else if units > 125 {
                assert!(chart.revenue[i] > chart.costs[i], "at {units} units");
            } else {
                assert_eq!(chart.revenue[i], chart.costs[i], "exactly at break-even");
            }
        }
    }

    #[test]
    fn price_below_cost_is_not_computable() {
        let analysis = analyze(&inputs(dec!(10), dec!(15), dec!(500), Decimal::ZERO));
        assert_eq!(analysis.outcome, BreakEvenOutcome::NotComputable);
        assert!(!analysis.show_chart());
        assert!(analysis.message.contains("Cannot calculate"));
    }

    #[test]
    fn price_equal_to_cost_is_not_computable() {
        let analysis = analyze(&inputs(dec!(15), dec!(15), dec!(500), dec!(100)));
        assert_eq!(analysis.outcome, BreakEvenOutcome::NotComputable);
        assert!(analysis.chart.is_none());
    }

    #[test]
    fn zero_startup_costs_reduce_to_simple_formula() {
        // 500 / (10 - 5) = 100
        let analysis = analyze(&inputs(dec!(10), dec!(5), dec!(500), Decimal::ZERO));
        assert_eq!(
            analysis.outcome,
            BreakEvenOutcome::Units { units: dec!(100) }
        );
    }

    #[test]
    fn fractional_break_even_floors_chart_step() {
        // 1000 / 8 = 125, startup 100/12 pushes it to 126.04…
        let analysis = analyze(&inputs(dec!(20), dec!(12), dec!(1000), dec!(100)));
        let chart = analysis.chart.unwrap();
        // max = floor(2 × 126.041…) = 252, step = 25
        assert_eq!(chart.labels[1], 25);
        assert_eq!(chart.labels.last(), Some(&250));
    }

    #[test]
    fn zero_amortization_months_skips_startup() {
        let mut i = inputs(dec!(20), dec!(12), dec!(800), dec!(2400));
        i.amortization_months = 0;
        let analysis = analyze(&i);
        assert_eq!(
            analysis.outcome,
            BreakEvenOutcome::Units { units: dec!(100) }
        );
    }
}
