//! Tuning parameter model
//!
//! A [`TuningParameter`] is one ECU-controllable quantity with an immutable
//! factory baseline and a live value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameter category, selects the multiplier rule a stage applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Turbocharger boost
    Boost,
    /// Fuel delivery
    Fuel,
    /// Ignition / injection timing
    Timing,
    /// Hard caps such as speed or torque limits
    Limiter,
    /// Everything else (EGR, flaps, ...)
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Boost => "boost",
            Category::Fuel => "fuel",
            Category::Timing => "timing",
            Category::Limiter => "limiter",
            Category::Other => "other",
        };
        f.write_str(s)
    }
}

/// Secondary tag that selects the special-case rules inside a category
///
/// Stage rules dispatch on this tag rather than on the display name, so
/// localized labels cannot silently change the behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subrole {
    /// No special handling
    #[default]
    None,
    /// Torque limiter, scaled by the stage torque multiplier
    Torque,
    /// Vehicle speed limiter, removed by every tuned stage
    Speed,
    /// Exhaust gas recirculation, disabled by every tuned stage
    Egr,
}

impl Subrole {
    /// Infer the subrole from an English display name
    ///
    /// Only used when a parameter is constructed without an explicit tag.
    pub fn infer(name: &str) -> Self {
        if name.contains("Torque") {
            Subrole::Torque
        } else if name.contains("Speed") {
            Subrole::Speed
        } else if name.contains("EGR") {
            Subrole::Egr
        } else {
            Subrole::None
        }
    }
}

/// One tunable ECU quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningParameter {
    /// Unique display name, the stable key within a session
    pub name: String,
    /// Category used for stage rules
    pub category: Category,
    /// Special-case tag within the category
    #[serde(default)]
    pub subrole: Subrole,
    /// Factory baseline
    original: f64,
    /// Live value
    pub(crate) current: f64,
    /// Display unit
    pub unit: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Simulated map address in the ECU image
    #[serde(default)]
    pub address: Option<u32>,
}

impl TuningParameter {
    /// Create a parameter at its baseline, inferring the subrole from the name
    pub fn new(
        name: impl Into<String>,
        category: Category,
        original: f64,
        unit: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let subrole = Subrole::infer(&name);
        Self {
            name,
            category,
            subrole,
            original,
            current: original,
            unit: unit.into(),
            description: String::new(),
            address: None,
        }
    }

    /// Override the inferred subrole
    pub fn with_subrole(mut self, subrole: Subrole) -> Self {
        self.subrole = subrole;
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a simulated map address
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = Some(address);
        self
    }

    /// Factory baseline value
    pub fn original(&self) -> f64 {
        self.original
    }

    /// Live value
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Whether the live value deviates from baseline
    pub fn is_modified(&self) -> bool {
        self.current != self.original
    }

    /// Input step the UI should offer for this parameter's unit
    pub fn input_step(&self) -> f64 {
        match self.unit.as_str() {
            "bar" => 0.1,
            "°BTDC" => 0.5,
            _ => 1.0,
        }
    }

    /// Copy of this parameter with a different live value
    pub(crate) fn with_current(&self, current: f64) -> Self {
        Self {
            current,
            ..self.clone()
        }
    }
}
