//! Parameter Store - canonical working set of tuning parameters
//!
//! The store is the only owner of the parameter list. It holds:
//! - The factory baseline and live value of every parameter
//! - The active stage identity of the session
//! - An export lock that blocks reinitialization mid-export

use std::collections::HashSet;

use tracing::debug;

use super::parameter::TuningParameter;
use crate::error::{Result, TuningError};
use crate::stage::StageProfile;

/// Change of the active stage identity caused by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    /// Stage active before the edit
    pub from: StageProfile,
    /// Stage active after the edit
    pub to: StageProfile,
}

impl StageTransition {
    /// Whether the edit changed the stage identity
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Holds the working set of parameters for one loaded file
#[derive(Debug, Default)]
pub struct ParameterStore {
    parameters: Vec<TuningParameter>,
    active_stage: StageProfile,
    /// Number of exports currently reading the store
    export_locks: usize,
}

impl ParameterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire working set
    ///
    /// Every value is validated before anything is replaced, and names must be
    /// unique. Each parameter starts at its baseline and the stage identity
    /// returns to stock.
    pub fn initialize(&mut self, defaults: Vec<TuningParameter>) -> Result<()> {
        if self.is_export_locked() {
            return Err(TuningError::InvalidState(
                "cannot reinitialize parameters while an export is in progress".to_string(),
            ));
        }

        let mut names = HashSet::with_capacity(defaults.len());
        for param in &defaults {
            check_finite(&param.name, param.original())?;
            if !names.insert(param.name.as_str()) {
                return Err(TuningError::DuplicateParameter(param.name.clone()));
            }
        }

        self.parameters = defaults
            .into_iter()
            .map(|p| {
                let original = p.original();
                p.with_current(original)
            })
            .collect();
        self.active_stage = StageProfile::Stock;
        debug!(count = self.parameters.len(), "parameter store initialized");
        Ok(())
    }

    /// Get a parameter by index
    pub fn get(&self, index: usize) -> Result<&TuningParameter> {
        self.parameters.get(index).ok_or(TuningError::OutOfRange {
            index,
            len: self.parameters.len(),
        })
    }

    /// Find the index of a parameter by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    /// Overwrite the live value of one parameter
    ///
    /// A manual edit always moves the session to the custom stage; the
    /// returned transition tells the caller what changed.
    pub fn set_current(&mut self, index: usize, value: f64) -> Result<StageTransition> {
        let len = self.parameters.len();
        let param = self
            .parameters
            .get_mut(index)
            .ok_or(TuningError::OutOfRange { index, len })?;
        check_finite(&param.name, value)?;

        param.current = value;
        debug!(name = %param.name, value, "parameter edited");
        Ok(self.enter_custom())
    }

    /// Restore one parameter to its baseline (counts as a manual edit)
    pub fn reset(&mut self, index: usize) -> Result<StageTransition> {
        let original = self.get(index)?.original();
        self.set_current(index, original)
    }

    /// All parameters in store order
    pub fn parameters(&self) -> &[TuningParameter] {
        &self.parameters
    }

    /// Iterate over parameters in store order
    pub fn iter(&self) -> impl Iterator<Item = &TuningParameter> {
        self.parameters.iter()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether any parameter deviates from baseline
    pub fn is_modified(&self) -> bool {
        self.parameters.iter().any(TuningParameter::is_modified)
    }

    /// Number of parameters that deviate from baseline
    pub fn modified_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_modified()).count()
    }

    /// Stage identity of the session
    pub fn active_stage(&self) -> StageProfile {
        self.active_stage
    }

    /// Swap in a fully derived parameter sequence and record its stage
    ///
    /// The caller must derive `parameters` from this store so names and
    /// baselines line up one-to-one.
    pub(crate) fn commit(&mut self, parameters: Vec<TuningParameter>, stage: StageProfile) {
        debug_assert_eq!(parameters.len(), self.parameters.len());
        self.parameters = parameters;
        self.active_stage = stage;
    }

    pub(crate) fn lock_export(&mut self) {
        self.export_locks += 1;
    }

    pub(crate) fn unlock_export(&mut self) {
        self.export_locks = self.export_locks.saturating_sub(1);
    }

    /// Whether an export currently holds the store
    pub fn is_export_locked(&self) -> bool {
        self.export_locks > 0
    }

    fn enter_custom(&mut self) -> StageTransition {
        let transition = StageTransition {
            from: self.active_stage,
            to: StageProfile::Custom,
        };
        self.active_stage = StageProfile::Custom;
        transition
    }
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::InvalidValue {
            name: name.to_string(),
            value,
        })
    }
}
