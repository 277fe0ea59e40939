//! Stage Profiles
//!
//! Named multiplier profiles and the engine that derives parameter values
//! from the factory baseline.

mod engine;
mod profile;

pub use engine::{apply_stage, derive_stage, round_to_hundredths};
pub use profile::{StageMultipliers, StageProfile};
