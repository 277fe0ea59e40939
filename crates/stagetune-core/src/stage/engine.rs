//! Stage application
//!
//! Every stage is derived from the factory baseline, never from the live
//! value, so switching stages cannot accumulate drift.

use tracing::info;

use super::profile::{StageMultipliers, StageProfile};
use crate::tune::{Category, ParameterStore, Subrole, TuningParameter};

/// Round to two decimal places, half away from zero
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the parameter sequence a profile produces
///
/// Pure: `parameters` is not touched. `Custom` returns the input unchanged.
pub fn derive_stage(parameters: &[TuningParameter], profile: StageProfile) -> Vec<TuningParameter> {
    match profile.multipliers() {
        Some(multipliers) => parameters
            .iter()
            .map(|p| p.with_current(stage_value(p, profile, &multipliers)))
            .collect(),
        None => parameters.to_vec(),
    }
}

/// Apply a profile to the store and return the resulting parameters
///
/// The whole derived sequence is swapped in at once. `Custom` is a no-op:
/// neither values nor the stage identity change.
pub fn apply_stage(store: &mut ParameterStore, profile: StageProfile) -> &[TuningParameter] {
    if profile != StageProfile::Custom {
        let derived = derive_stage(store.parameters(), profile);
        store.commit(derived, profile);
        info!(stage = %profile, modified = store.modified_count(), "stage applied");
    }
    store.parameters()
}

fn stage_value(
    param: &TuningParameter,
    profile: StageProfile,
    multipliers: &StageMultipliers,
) -> f64 {
    let original = param.original();

    // Stock restores the baseline bit for bit, even for values with more
    // than two decimals. Tuned stages round every value.
    if profile == StageProfile::Stock {
        return original;
    }

    let value = match (param.category, param.subrole) {
        (Category::Limiter, Subrole::Torque) => original * multipliers.torque,
        (Category::Limiter, Subrole::Speed) | (Category::Other, Subrole::Egr) => 0.0,
        (category, _) => original * multipliers.for_category(category).unwrap_or(1.0),
    };
    round_to_hundredths(value)
}
