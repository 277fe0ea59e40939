//! Ingest boundary
//!
//! Checks an uploaded payload against the extension allow-list and builds the
//! [`EcuFile`] record for it.

use chrono::Utc;
use crc32fast::Hasher;
use uuid::Uuid;

use super::file::{EcuFamily, EcuFile};
use crate::error::{Result, TuningError};

/// Only the start of the image is searched for a vendor marker
const HEADER_SCAN_LEN: usize = 1024;

const FAMILY_MARKERS: [(&[u8], EcuFamily); 3] = [
    (b"BOSCH", EcuFamily::BoschEdc17),
    (b"SIEMENS", EcuFamily::SiemensSid),
    (b"DELPHI", EcuFamily::DelphiDcm),
];

/// Raw upload handed over by the upload surface
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original file name
    pub name: String,
    /// MIME type reported by the uploader
    pub mime_type: String,
    /// File contents
    pub payload: Vec<u8>,
}

impl UploadRequest {
    /// Create a request with the generic binary MIME type
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: "application/octet-stream".to_string(),
            payload,
        }
    }

    /// Lowercase extension of the file name, including the dot
    pub fn extension(&self) -> Option<String> {
        let dot = self.name.rfind('.')?;
        Some(self.name[dot..].to_lowercase())
    }
}

/// Reject payloads outside the allow-list or without content
pub fn validate(request: &UploadRequest, allowed_extensions: &[String]) -> Result<()> {
    let allowed = request
        .extension()
        .map(|ext| allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
        .unwrap_or(false);
    if !allowed {
        return Err(TuningError::UnsupportedFormat(request.name.clone()));
    }
    if request.payload.is_empty() {
        return Err(TuningError::EmptyPayload(request.name.clone()));
    }
    Ok(())
}

/// Build the file record for an accepted payload
pub fn decode(request: &UploadRequest, upload_id: Uuid) -> EcuFile {
    EcuFile {
        name: request.name.clone(),
        size: request.payload.len() as u64,
        mime_type: request.mime_type.clone(),
        uploaded_at: Utc::now().to_rfc3339(),
        checksum: Some(fingerprint(&request.payload, upload_id)),
        family: detect_family(&request.payload),
    }
}

/// Detect the ECU family from a vendor marker near the start of the image
pub fn detect_family(payload: &[u8]) -> EcuFamily {
    let header = &payload[..payload.len().min(HEADER_SCAN_LEN)];
    FAMILY_MARKERS
        .iter()
        .find(|(marker, _)| header.windows(marker.len()).any(|w| w == *marker))
        .map(|(_, family)| *family)
        .unwrap_or_default()
}

/// Display fingerprint: CRC32 of the payload tagged with the upload id
///
/// The upload id suffix keeps two uploads of the same image apart.
pub fn fingerprint(payload: &[u8], upload_id: Uuid) -> String {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    let id = upload_id.simple().to_string();
    format!("CRC32: {:08X}-{}", hasher.finalize(), &id[..8])
}
