//! Stage profiles and their multiplier tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TuningError;
use crate::tune::Category;

/// A named tuning profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageProfile {
    /// Factory calibration
    #[default]
    Stock,
    /// Mild tune
    Stage1,
    /// Tune for supporting hardware upgrades
    Stage2,
    /// Aggressive tune
    Stage3,
    /// Hand-edited values; a label only, never a transform
    Custom,
}

/// Per-category multipliers of a named stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageMultipliers {
    /// Boost pressure multiplier
    pub boost: f64,
    /// Fuel pressure multiplier
    pub fuel: f64,
    /// Timing advance multiplier
    pub timing: f64,
    /// Torque limiter multiplier
    pub torque: f64,
}

impl StageMultipliers {
    const STOCK: Self = Self {
        boost: 1.0,
        fuel: 1.0,
        timing: 1.0,
        torque: 1.0,
    };
    const STAGE1: Self = Self {
        boost: 1.15,
        fuel: 1.12,
        timing: 1.05,
        torque: 1.20,
    };
    const STAGE2: Self = Self {
        boost: 1.30,
        fuel: 1.25,
        timing: 1.10,
        torque: 1.35,
    };
    const STAGE3: Self = Self {
        boost: 1.45,
        fuel: 1.40,
        timing: 1.15,
        torque: 1.50,
    };

    /// Multiplier for a scaled category, `None` for limiter/other
    pub fn for_category(&self, category: Category) -> Option<f64> {
        match category {
            Category::Boost => Some(self.boost),
            Category::Fuel => Some(self.fuel),
            Category::Timing => Some(self.timing),
            Category::Limiter | Category::Other => None,
        }
    }
}

impl StageProfile {
    /// Every profile, in UI order
    pub const ALL: [StageProfile; 5] = [
        StageProfile::Stock,
        StageProfile::Stage1,
        StageProfile::Stage2,
        StageProfile::Stage3,
        StageProfile::Custom,
    ];

    /// Multipliers for a named stage; `Custom` has none
    pub fn multipliers(self) -> Option<StageMultipliers> {
        match self {
            StageProfile::Stock => Some(StageMultipliers::STOCK),
            StageProfile::Stage1 => Some(StageMultipliers::STAGE1),
            StageProfile::Stage2 => Some(StageMultipliers::STAGE2),
            StageProfile::Stage3 => Some(StageMultipliers::STAGE3),
            StageProfile::Custom => None,
        }
    }

    /// Whether this profile modifies the factory calibration
    ///
    /// Tuned profiles remove the speed limiter and disable EGR.
    pub fn is_tuned(self) -> bool {
        matches!(
            self,
            StageProfile::Stage1 | StageProfile::Stage2 | StageProfile::Stage3
        )
    }

    /// Short identifier used in config files and exports
    pub fn as_str(self) -> &'static str {
        match self {
            StageProfile::Stock => "stock",
            StageProfile::Stage1 => "stage1",
            StageProfile::Stage2 => "stage2",
            StageProfile::Stage3 => "stage3",
            StageProfile::Custom => "custom",
        }
    }

    /// Label shown in the stage selector
    pub fn label(self) -> &'static str {
        match self {
            StageProfile::Stock => "Stock",
            StageProfile::Stage1 => "Stage 1",
            StageProfile::Stage2 => "Stage 2",
            StageProfile::Stage3 => "Stage 3",
            StageProfile::Custom => "Custom",
        }
    }
}

impl fmt::Display for StageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageProfile {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "stock" => Ok(StageProfile::Stock),
            "stage1" => Ok(StageProfile::Stage1),
            "stage2" => Ok(StageProfile::Stage2),
            "stage3" => Ok(StageProfile::Stage3),
            "custom" => Ok(StageProfile::Custom),
            _ => Err(TuningError::UnknownStage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stage_names() {
        assert_eq!("stage1".parse::<StageProfile>().unwrap(), StageProfile::Stage1);
        assert_eq!("Stage 2".parse::<StageProfile>().unwrap(), StageProfile::Stage2);
        assert_eq!("STOCK".parse::<StageProfile>().unwrap(), StageProfile::Stock);
        assert!(matches!(
            "stage4".parse::<StageProfile>(),
            Err(TuningError::UnknownStage(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for profile in StageProfile::ALL {
            assert_eq!(profile.to_string().parse::<StageProfile>().unwrap(), profile);
        }
    }

    #[test]
    fn test_custom_has_no_multipliers() {
        assert!(StageProfile::Custom.multipliers().is_none());
        assert!(!StageProfile::Custom.is_tuned());
        assert!(!StageProfile::Stock.is_tuned());
    }

    #[test]
    fn test_multipliers_increase_across_stages() {
        let named = [
            StageProfile::Stock,
            StageProfile::Stage1,
            StageProfile::Stage2,
            StageProfile::Stage3,
        ];
        for pair in named.windows(2) {
            let lo = pair[0].multipliers().unwrap();
            let hi = pair[1].multipliers().unwrap();
            assert!(lo.boost < hi.boost);
            assert!(lo.fuel < hi.fuel);
            assert!(lo.timing < hi.timing);
            assert!(lo.torque < hi.torque);
        }
    }
}
