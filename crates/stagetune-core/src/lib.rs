//! # StageTune Core Library
//!
//! Parameter staging and diff engine for ECU chiptuning.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - A parameter store holding factory baselines and live values
//! - Stage profiles (stock, stage 1-3) derived from the baseline
//! - Change summaries and export artifacts
//! - The ECU file upload lifecycle, with cancellable decoding
//!
//! ## Example
//!
//! ```rust,ignore
//! use stagetune_core::prelude::*;
//!
//! let mut session = TuningSession::new(SessionConfig::default());
//! session.upload(UploadRequest::new("golf.bin", image)).await?;
//!
//! session.apply_stage(StageProfile::Stage1)?;
//! for change in session.diff().changes {
//!     println!("{}: {} -> {} {}", change.name, change.original, change.current, change.unit);
//! }
//!
//! let artifact = session.export()?;
//! std::fs::write(&artifact.filename, &artifact.payload)?;
//! ```

pub mod config;
pub mod diagnostics;
pub mod ecu_file;
pub mod error;
pub mod export;
pub mod session;
pub mod stage;
pub mod tune;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::diagnostics::{CheckKind, CheckStatus, DiagnosticCheck};
    pub use crate::ecu_file::{EcuFamily, EcuFile, FileState, UploadRequest, UploadTask};
    pub use crate::error::{Result, TuningError};
    pub use crate::export::{ExportArtifact, ParameterChange, ParameterDiff};
    pub use crate::session::{PendingExport, SessionStatus, TuningSession};
    pub use crate::stage::StageProfile;
    pub use crate::tune::{Category, ParameterStore, StageTransition, Subrole, TuningParameter};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
