//! Wizard step machine — the linear sequence of input pages.

use serde::{Deserialize, Serialize};

use super::profile::BusinessProfile;
use rust_decimal::Decimal;

/// The steps of the wizard.
///
/// Progresses linearly: Step1 (description) → Step2 (audience, location) →
/// Step3 (price) → Step4 (cost of goods) → Step5 (overhead) → Step6 (startup,
/// marketing, volume, horizon) → Summary. Summary is terminal but
/// re-enterable; it recomputes from the stored profile and never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
    Step6,
    Summary,
}

impl WizardStep {
    /// All input steps, in order (Summary excluded).
    pub const INPUT_STEPS: [WizardStep; 6] = [
        Self::Step1,
        Self::Step2,
        Self::Step3,
        Self::Step4,
        Self::Step5,
        Self::Step6,
    ];

    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::Step1 => Some(Self::Step2),
            Self::Step2 => Some(Self::Step3),
            Self::Step3 => Some(Self::Step4),
            Self::Step4 => Some(Self::Step5),
            Self::Step5 => Some(Self::Step6),
            Self::Step6 => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// The step preceding this one, if any.
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            Self::Step1 => None,
            Self::Step2 => Some(Self::Step1),
            Self::Step3 => Some(Self::Step2),
            Self::Step4 => Some(Self::Step3),
            Self::Step5 => Some(Self::Step4),
            Self::Step6 => Some(Self::Step5),
            Self::Summary => Some(Self::Step6),
        }
    }

    /// Map a 1-based step number from the route path.
    pub fn from_index(index: u8) -> Option<WizardStep> {
        match index {
            1 => Some(Self::Step1),
            2 => Some(Self::Step2),
            3 => Some(Self::Step3),
            4 => Some(Self::Step4),
            5 => Some(Self::Step5),
            6 => Some(Self::Step6),
            _ => None,
        }
    }

    /// 1-based step number for route paths (Summary has its own route).
    pub fn index(&self) -> u8 {
        match self {
            Self::Step1 => 1,
            Self::Step2 => 2,
            Self::Step3 => 3,
            Self::Step4 => 4,
            Self::Step5 => 5,
            Self::Step6 => 6,
            Self::Summary => 7,
        }
    }

    /// Whether this step's own required field(s) are set in the profile.
    ///
    /// "Set" means non-empty for text and non-zero for numbers — a profile
    /// field still at its default has not been through its step yet. Step 6
    /// has no gate of its own: zero startup costs are a legitimate answer,
    /// and nothing comes after Summary.
    pub fn required_met(&self, profile: &BusinessProfile) -> bool {
        match self {
            Self::Step1 => !profile.product_description.trim().is_empty(),
            Self::Step2 => {
                !profile.target_audience.trim().is_empty() && !profile.location.trim().is_empty()
            }
            Self::Step3 => profile.price_range > Decimal::ZERO,
            Self::Step4 => profile.cost_of_goods > Decimal::ZERO,
            Self::Step5 => profile.overhead_costs > Decimal::ZERO,
            Self::Step6 | Self::Summary => true,
        }
    }

    /// Guard for entering this step: every earlier step's required field must
    /// already be present. Returns the step to silently redirect to when the
    /// prerequisite chain has a gap (never an error).
    pub fn redirect_target(&self, profile: &BusinessProfile) -> Option<WizardStep> {
        for earlier in Self::INPUT_STEPS {
            if earlier == *self {
                break;
            }
            if !earlier.required_met(profile) {
                return Some(earlier);
            }
        }
        None
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Step1 => "step1",
            Self::Step2 => "step2",
            Self::Step3 => "step3",
            Self::Step4 => "step4",
            Self::Step5 => "step5",
            Self::Step6 => "step6",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn complete_profile() -> BusinessProfile {
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

    #[test]
    fn next_walks_all_steps() {
        let expected = [
            WizardStep::Step2,
            WizardStep::Step3,
            WizardStep::Step4,
            WizardStep::Step5,
            WizardStep::Step6,
            WizardStep::Summary,
        ];
        let mut current = WizardStep::Step1;
        for expected_next in expected {
            let next = current.next().unwrap();
            assert_eq!(next, expected_next);
            assert_eq!(next.previous(), Some(current));
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn from_index_roundtrip() {
        for step in WizardStep::INPUT_STEPS {
            assert_eq!(WizardStep::from_index(step.index()), Some(step));
        }
        assert_eq!(WizardStep::from_index(0), None);
        assert_eq!(WizardStep::from_index(7), None);
    }

    #[test]
    fn empty_profile_only_enters_step1() {
        let profile = BusinessProfile::new();
        assert_eq!(WizardStep::Step1.redirect_target(&profile), None);
        assert_eq!(
            WizardStep::Step2.redirect_target(&profile),
            Some(WizardStep::Step1)
        );
        assert_eq!(
            WizardStep::Summary.redirect_target(&profile),
            Some(WizardStep::Step1)
        );
    }

    #[test]
    fn redirect_points_at_first_gap() {
        let mut profile = complete_profile();
        // Blank out the middle of the chain.
        profile.price_range = Decimal::ZERO;
        assert_eq!(
            WizardStep::Step6.redirect_target(&profile),
            Some(WizardStep::Step3)
        );
        assert_eq!(
            WizardStep::Step5.redirect_target(&profile),
            Some(WizardStep::Step3)
        );
        // Step 3 itself is enterable — its own field being unset is the point.
        assert_eq!(WizardStep::Step3.redirect_target(&profile), None);
    }

    #[test]
    fn complete_profile_enters_everything() {
        let profile = complete_profile();
        for step in WizardStep::INPUT_STEPS {
            assert_eq!(step.redirect_target(&profile), None, "{step} should open");
        }
        assert_eq!(WizardStep::Summary.redirect_target(&profile), None);
    }

    #[test]
    fn whitespace_text_does_not_satisfy_prerequisite() {
        let mut profile = BusinessProfile::new();
        profile.product_description = "   ".to_string();
        assert_eq!(
            WizardStep::Step2.redirect_target(&profile),
            Some(WizardStep::Step1)
        );
    }
}
