//! Parameter diff
//!
//! Lists every parameter whose live value deviates from the factory baseline.

use serde::{Deserialize, Serialize};

use crate::tune::{ParameterStore, TuningParameter};

/// One parameter that deviates from baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    /// Name of the parameter
    pub name: String,
    /// Factory baseline
    pub original: f64,
    /// Live value
    pub current: f64,
    /// Display unit
    pub unit: String,
}

impl ParameterChange {
    fn from_parameter(param: &TuningParameter) -> Self {
        Self {
            name: param.name.clone(),
            original: param.original(),
            current: param.current(),
            unit: param.unit.clone(),
        }
    }

    /// Relative change from baseline in percent
    ///
    /// `None` when the baseline is zero.
    pub fn percent_change(&self) -> Option<f64> {
        if self.original == 0.0 {
            return None;
        }
        Some((self.current - self.original) / self.original * 100.0)
    }

    /// Whether the live value is above the baseline
    pub fn is_increase(&self) -> bool {
        self.current > self.original
    }
}

/// Result of comparing a store against its baseline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDiff {
    /// Changes in store order
    pub changes: Vec<ParameterChange>,
}

impl ParameterDiff {
    /// Collect every modified parameter of the store
    pub fn compute(store: &ParameterStore) -> Self {
        Self::from_parameters(store.parameters())
    }

    /// Collect every modified parameter of a sequence
    pub fn from_parameters(parameters: &[TuningParameter]) -> Self {
        let changes = parameters
            .iter()
            .filter(|p| p.current() != p.original())
            .map(ParameterChange::from_parameter)
            .collect();
        Self { changes }
    }

    /// Whether no parameter deviates from baseline
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed parameters
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Look up the change for one parameter
    pub fn get(&self, name: &str) -> Option<&ParameterChange> {
        self.changes.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tune::Category;

    #[test]
    fn test_diff_identical() {
        let params = vec![TuningParameter::new(
            "Injection Timing",
            Category::Timing,
            8.5,
            "°BTDC",
        )];
        let diff = ParameterDiff::from_parameters(&params);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_keeps_store_order() {
        let mut params = vec![
            TuningParameter::new("Turbo Boost Pressure", Category::Boost, 1.2, "bar"),
            TuningParameter::new("Fuel Rail Pressure", Category::Fuel, 1600.0, "bar"),
            TuningParameter::new("Injection Timing", Category::Timing, 8.5, "°BTDC"),
        ];
        params[2].current = 9.0;
        params[0].current = 1.4;

        let diff = ParameterDiff::from_parameters(&params);
        let names: Vec<&str> = diff.changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Turbo Boost Pressure", "Injection Timing"]);
        assert_eq!(diff.change_count(), 2);
    }

    #[test]
    fn test_percent_change() {
        let change = ParameterChange {
            name: "Torque Limiter".to_string(),
            original: 400.0,
            current: 480.0,
            unit: "Nm".to_string(),
        };
        assert!((change.percent_change().unwrap() - 20.0).abs() < 1e-9);
        assert!(change.is_increase());

        let removed = ParameterChange {
            name: "Speed Limiter".to_string(),
            original: 250.0,
            current: 0.0,
            unit: "km/h".to_string(),
        };
        assert!((removed.percent_change().unwrap() + 100.0).abs() < 1e-9);
        assert!(!removed.is_increase());
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        let change = ParameterChange {
            name: "Launch Control".to_string(),
            original: 0.0,
            current: 1.0,
            unit: "".to_string(),
        };
        assert_eq!(change.percent_change(), None);
    }
}
