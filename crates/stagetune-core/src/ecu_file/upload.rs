//! Asynchronous upload task
//!
//! Decoding runs on a spawned tokio task after the configured decode delay.
//! The task can be cancelled at any point before it finishes.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::file::EcuFile;
use super::ingest::{decode, UploadRequest};
use crate::error::{Result, TuningError};

/// Handle to an in-flight upload
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct UploadTask {
    id: Uuid,
    file_name: String,
    token: CancellationToken,
    handle: JoinHandle<Result<EcuFile>>,
}

impl UploadTask {
    /// Start decoding `request` after `decode_delay`
    pub fn spawn(request: UploadRequest, decode_delay: Duration) -> Self {
        let id = Uuid::new_v4();
        let file_name = request.name.clone();
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!(upload = %id, "upload cancelled before decode finished");
                    Err(TuningError::UploadCancelled)
                }
                _ = tokio::time::sleep(decode_delay) => Ok(decode(&request, id)),
            }
        });

        Self {
            id,
            file_name,
            token,
            handle,
        }
    }

    /// Unique id of this upload
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the file being uploaded
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Token that cancels this upload, for callers that hand the task off
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the decode task has finished
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the decoded file
    ///
    /// A cancellation requested after decoding finished still wins, so a
    /// cancelled upload never yields a file.
    pub async fn wait(self) -> Result<EcuFile> {
        let result = self.handle.await.map_err(|e| {
            warn!(upload = %self.id, "upload task failed: {e}");
            TuningError::UploadFailed(e.to_string())
        })?;
        if self.token.is_cancelled() {
            return Err(TuningError::UploadCancelled);
        }
        result
    }
}
