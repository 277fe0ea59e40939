//! Tuning Parameters
//!
//! Parameter model and the store that owns the working set.

mod defaults;
mod parameter;
mod store;

pub use defaults::default_parameters;
pub use parameter::{Category, Subrole, TuningParameter};
pub use store::{ParameterStore, StageTransition};
