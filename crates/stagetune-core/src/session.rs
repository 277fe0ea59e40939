//! Tuning Session
//!
//! The session owns everything one tuning workflow needs:
//! - The resident ECU file and the upload in flight, if any
//! - The parameter store and its active stage
//! - The export lock
//!
//! UI code only reads from it and dispatches edits to it.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::diagnostics::{run_diagnostics, DiagnosticCheck};
use crate::ecu_file::{validate, EcuFile, FileState, UploadRequest, UploadTask};
use crate::error::{Result, TuningError};
use crate::export::{build_export, ExportArtifact, ParameterDiff};
use crate::stage::{apply_stage, derive_stage, StageProfile};
use crate::tune::{default_parameters, ParameterStore, StageTransition, TuningParameter};

/// An export that has been built but not yet handed off
///
/// The parameter store cannot be reinitialized until this is passed back to
/// [`TuningSession::finish_export`].
#[must_use = "pass the pending export to TuningSession::finish_export"]
#[derive(Debug)]
pub struct PendingExport {
    artifact: ExportArtifact,
}

impl PendingExport {
    /// The artifact being exported
    pub fn artifact(&self) -> &ExportArtifact {
        &self.artifact
    }
}

/// Snapshot of the session for status displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Lifecycle state
    pub file_state: FileState,
    /// Resident file name
    pub current_file: Option<String>,
    /// Active stage identity
    pub active_stage: StageProfile,
    /// Number of parameters off baseline
    pub modified_count: usize,
    /// Whether an export is being handed off
    pub export_in_progress: bool,
}

/// The upload in flight
#[derive(Debug)]
struct PendingUpload {
    id: Uuid,
    token: CancellationToken,
}

/// One tuning session
#[derive(Debug, Default)]
pub struct TuningSession {
    config: SessionConfig,
    store: ParameterStore,
    file: Option<EcuFile>,
    pending_upload: Option<PendingUpload>,
}

impl TuningSession {
    /// Create a session with no resident file
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Session settings
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Lifecycle state of the resident file
    pub fn file_state(&self) -> FileState {
        if self.pending_upload.is_some() {
            FileState::Uploading
        } else if self.file.is_some() {
            FileState::Ready
        } else {
            FileState::None
        }
    }

    /// The resident file
    pub fn current_file(&self) -> Option<&EcuFile> {
        self.file.as_ref()
    }

    /// The parameter store
    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// All parameters in store order
    pub fn parameters(&self) -> &[TuningParameter] {
        self.store.parameters()
    }

    /// Get a parameter by index
    pub fn parameter(&self, index: usize) -> Result<&TuningParameter> {
        self.store.get(index)
    }

    /// Stage identity of the session
    pub fn active_stage(&self) -> StageProfile {
        self.store.active_stage()
    }

    // === Upload ===

    /// Start decoding a new file
    ///
    /// Only one upload may be in flight. The payload is validated before the
    /// task starts. Must be called inside a tokio runtime.
    pub fn begin_upload(&mut self, request: UploadRequest) -> Result<UploadTask> {
        if self.pending_upload.is_some() {
            return Err(TuningError::UploadInProgress);
        }
        if self.store.is_export_locked() {
            return Err(TuningError::InvalidState(
                "cannot load a new file while an export is in progress".to_string(),
            ));
        }
        validate(&request, &self.config.allowed_extensions)?;

        let task = UploadTask::spawn(request, self.config.decode_delay());
        self.pending_upload = Some(PendingUpload {
            id: task.id(),
            token: task.cancellation_token(),
        });
        info!(upload = %task.id(), file = task.file_name(), "upload started");
        Ok(task)
    }

    /// Wait for an upload and make its file resident
    ///
    /// On success the previous parameter session is discarded and the store
    /// starts over from the defaults. On failure or cancellation the previous
    /// file, parameters and stage are left untouched.
    pub async fn complete_upload(&mut self, task: UploadTask) -> Result<&EcuFile> {
        let id = task.id();
        let result = task.wait().await;

        // Cancelled or superseded while we were waiting
        if self.pending_upload.as_ref().map(|p| p.id) != Some(id) {
            return Err(TuningError::UploadCancelled);
        }
        self.pending_upload = None;

        let file = match result {
            Ok(file) => file,
            Err(e) => {
                warn!(upload = %id, "upload did not complete: {e}");
                return Err(e);
            }
        };

        self.store.initialize(default_parameters())?;
        info!(
            upload = %id,
            file = %file.name,
            family = %file.family,
            "file ready"
        );
        Ok(&*self.file.insert(file))
    }

    /// Upload a file and wait for it to become resident
    pub async fn upload(&mut self, request: UploadRequest) -> Result<&EcuFile> {
        let task = self.begin_upload(request)?;
        self.complete_upload(task).await
    }

    /// Cancel the upload in flight
    ///
    /// Returns `false` when nothing was uploading. The previous file and
    /// parameters stay resident.
    pub fn cancel_upload(&mut self) -> bool {
        match self.pending_upload.take() {
            Some(pending) => {
                pending.token.cancel();
                info!(upload = %pending.id, "upload cancelled");
                true
            }
            None => false,
        }
    }

    // === Editing ===

    /// Apply a stage profile to every parameter and return the result
    pub fn apply_stage(&mut self, profile: StageProfile) -> Result<&[TuningParameter]> {
        self.require_file()?;
        Ok(apply_stage(&mut self.store, profile))
    }

    /// Preview a stage without applying it
    pub fn preview_stage(&self, profile: StageProfile) -> Vec<TuningParameter> {
        derive_stage(self.store.parameters(), profile)
    }

    /// Set the live value of one parameter, entering the custom stage
    pub fn set_current(&mut self, index: usize, value: f64) -> Result<StageTransition> {
        self.require_file()?;
        self.store.set_current(index, value)
    }

    /// Set the live value of a parameter by name
    pub fn set_current_by_name(&mut self, name: &str, value: f64) -> Result<StageTransition> {
        self.require_file()?;
        let index = self
            .store
            .index_of(name)
            .ok_or_else(|| TuningError::UnknownParameter(name.to_string()))?;
        self.store.set_current(index, value)
    }

    /// Restore one parameter to its baseline
    pub fn reset(&mut self, index: usize) -> Result<StageTransition> {
        self.require_file()?;
        self.store.reset(index)
    }

    // === Diff / export ===

    /// Parameters that deviate from baseline
    pub fn diff(&self) -> ParameterDiff {
        ParameterDiff::compute(&self.store)
    }

    /// Build an export and hold the store until it is handed off
    pub fn begin_export(&mut self) -> Result<PendingExport> {
        let artifact = build_export(
            self.file.as_ref(),
            &self.diff(),
            self.store.active_stage(),
            &self.config.export_suffix,
        )?;
        self.store.lock_export();
        Ok(PendingExport { artifact })
    }

    /// Release the store after the export has been handed off
    pub fn finish_export(&mut self, pending: PendingExport) -> ExportArtifact {
        self.store.unlock_export();
        pending.artifact
    }

    /// Build and hand off an export in one step
    pub fn export(&mut self) -> Result<ExportArtifact> {
        let pending = self.begin_export()?;
        Ok(self.finish_export(pending))
    }

    // === Reporting ===

    /// Diagnostics for the resident file
    pub fn diagnostics(&self) -> Result<Vec<DiagnosticCheck>> {
        let file = self.require_file()?;
        Ok(run_diagnostics(file, &self.store))
    }

    /// Status snapshot
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            file_state: self.file_state(),
            current_file: self.file.as_ref().map(|f| f.name.clone()),
            active_stage: self.store.active_stage(),
            modified_count: self.store.modified_count(),
            export_in_progress: self.store.is_export_locked(),
        }
    }

    fn require_file(&self) -> Result<&EcuFile> {
        self.file.as_ref().ok_or(TuningError::NoFileLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_config() -> SessionConfig {
        SessionConfig {
            decode_delay_ms: 0,
            ..SessionConfig::default()
        }
    }

    fn request(name: &str) -> UploadRequest {
        UploadRequest::new(name, b"BOSCH EDC17CP14".to_vec())
    }

    #[test]
    fn test_new_session_has_no_file() {
        let session = TuningSession::new(SessionConfig::default());
        assert_eq!(session.file_state(), FileState::None);
        assert!(session.parameters().is_empty());
        assert_eq!(session.active_stage(), StageProfile::Stock);
    }

    #[test]
    fn test_no_file_no_mutation() {
        let mut session = TuningSession::new(SessionConfig::default());
        assert!(matches!(
            session.apply_stage(StageProfile::Stage1),
            Err(TuningError::NoFileLoaded)
        ));
        assert!(matches!(
            session.set_current(0, 1.0),
            Err(TuningError::NoFileLoaded)
        ));
        assert!(matches!(session.export(), Err(TuningError::NoFileLoaded)));
        assert_eq!(session.active_stage(), StageProfile::Stock);
        assert!(session.parameters().is_empty());
    }

    #[tokio::test]
    async fn test_upload_makes_file_ready() {
        let mut session = TuningSession::new(instant_config());
        let file = session.upload(request("golf.bin")).await.unwrap();
        assert_eq!(file.name, "golf.bin");
        assert_eq!(session.file_state(), FileState::Ready);
        assert_eq!(session.parameters().len(), default_parameters().len());
    }

    #[tokio::test]
    async fn test_rejected_extension_leaves_state() {
        let mut session = TuningSession::new(instant_config());
        let result = session.begin_upload(request("golf.zip"));
        assert!(matches!(result, Err(TuningError::UnsupportedFormat(_))));
        assert_eq!(session.file_state(), FileState::None);
    }

    #[tokio::test]
    async fn test_export_lock_blocks_new_upload() {
        let mut session = TuningSession::new(instant_config());
        session.upload(request("golf.bin")).await.unwrap();

        let pending = session.begin_export().unwrap();
        assert!(session.status().export_in_progress);
        assert!(matches!(
            session.begin_upload(request("polo.bin")),
            Err(TuningError::InvalidState(_))
        ));

        let artifact = session.finish_export(pending);
        assert_eq!(artifact.filename, "golf_modified.bin");
        assert!(!session.status().export_in_progress);
        session.upload(request("polo.bin")).await.unwrap();
    }

    #[tokio::test]
    async fn test_apply_stage_returns_committed_parameters() {
        let mut session = TuningSession::new(instant_config());
        session.upload(request("golf.bin")).await.unwrap();

        let applied = session.apply_stage(StageProfile::Stage1).unwrap().to_vec();
        assert_eq!(applied[0].current(), 1.38);
        assert_eq!(applied.as_slice(), session.parameters());
        assert_eq!(session.active_stage(), StageProfile::Stage1);
    }

    #[tokio::test]
    async fn test_set_current_by_name() {
        let mut session = TuningSession::new(instant_config());
        session.upload(request("golf.bin")).await.unwrap();

        session.set_current_by_name("Injection Timing", 9.0).unwrap();
        assert_eq!(session.active_stage(), StageProfile::Custom);
        assert!(matches!(
            session.set_current_by_name("Launch Control", 1.0),
            Err(TuningError::UnknownParameter(_))
        ));
    }
}
