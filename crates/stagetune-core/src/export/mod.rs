//! Diff and Export
//!
//! Change summary against the factory baseline and the export artifact
//! handed to the download surface.

mod artifact;
mod diff;

pub use artifact::{
    build_export, build_export_at, derive_export_name, ExportArtifact, ExportManifest,
    SourceInfo, EXPORT_CONTENT_TYPE, EXPORT_FORMAT_VERSION, EXPORT_MAGIC,
};
pub use diff::{ParameterChange, ParameterDiff};
