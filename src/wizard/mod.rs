//! Wizard core — the linear step sequence, its validation/guard rules, and
//! the business profile that accumulates across steps.

pub mod machine;
pub mod profile;
pub mod step;
pub mod view;

pub use machine::{StepOutcome, WizardMachine, FIELD_KEY, GET_SUGGESTION_KEY};
pub use profile::BusinessProfile;
pub use step::WizardStep;
