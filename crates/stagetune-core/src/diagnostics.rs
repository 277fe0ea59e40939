//! File diagnostics
//!
//! Integrity, compatibility and safety checks shown after a file is loaded.

use serde::{Deserialize, Serialize};

use crate::ecu_file::EcuFile;
use crate::tune::{Category, ParameterStore, Subrole};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Check passed
    Success,
    /// Worth a look before flashing
    Warning,
    /// Check failed
    Error,
}

/// Which aspect a check covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Checksum present on the resident file
    Integrity,
    /// ECU family recognized
    Compatibility,
    /// Safety advice for the current tune
    Safety,
}

/// A diagnostic check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticCheck {
    /// Aspect covered
    pub kind: CheckKind,
    /// Outcome
    pub status: CheckStatus,
    /// Short explanation for display
    pub message: String,
}

impl DiagnosticCheck {
    fn new(kind: CheckKind, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }
}

/// Run every check against the resident file and parameter set
pub fn run_diagnostics(file: &EcuFile, store: &ParameterStore) -> Vec<DiagnosticCheck> {
    vec![
        check_integrity(file),
        check_compatibility(file),
        check_safety(store),
    ]
}

fn check_integrity(file: &EcuFile) -> DiagnosticCheck {
    match &file.checksum {
        Some(_) => {
            DiagnosticCheck::new(CheckKind::Integrity, CheckStatus::Success, "Checksum valid")
        }
        None => DiagnosticCheck::new(CheckKind::Integrity, CheckStatus::Error, "Checksum missing"),
    }
}

fn check_compatibility(file: &EcuFile) -> DiagnosticCheck {
    if file.family.is_known() {
        DiagnosticCheck::new(
            CheckKind::Compatibility,
            CheckStatus::Success,
            format!("Compatible with {}", file.family),
        )
    } else {
        DiagnosticCheck::new(
            CheckKind::Compatibility,
            CheckStatus::Warning,
            "ECU family not recognized",
        )
    }
}

fn check_safety(store: &ParameterStore) -> DiagnosticCheck {
    let disabled: Vec<&str> = store
        .iter()
        .filter(|p| p.current() == 0.0 && p.original() != 0.0)
        .filter(|p| {
            matches!(
                (p.category, p.subrole),
                (Category::Limiter, Subrole::Speed) | (Category::Other, Subrole::Egr)
            )
        })
        .map(|p| p.name.as_str())
        .collect();

    if disabled.is_empty() {
        DiagnosticCheck::new(CheckKind::Safety, CheckStatus::Warning, "Backup recommended")
    } else {
        DiagnosticCheck::new(
            CheckKind::Safety,
            CheckStatus::Warning,
            format!("Backup recommended; disabled: {}", disabled.join(", ")),
        )
    }
}
