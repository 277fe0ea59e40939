//! ECU File Lifecycle
//!
//! Ingest validation, simulated fingerprinting and the asynchronous upload
//! task that turns a raw payload into a resident [`EcuFile`].

mod file;
mod ingest;
mod upload;

pub use file::{EcuFamily, EcuFile, FileState};
pub use ingest::{decode, detect_family, fingerprint, validate, UploadRequest};
pub use upload::UploadTask;
