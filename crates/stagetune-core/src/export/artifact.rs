//! Export artifact
//!
//! The exported payload is a small binary envelope around a JSON manifest:
//! - 4 bytes: magic `STGX`
//! - 2 bytes: format version (big-endian)
//! - 4 bytes: manifest length (big-endian)
//! - N bytes: JSON manifest
//! - 4 bytes: CRC32 of the manifest (big-endian)

use byteorder::{BigEndian, ByteOrder};
use chrono::Utc;
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::diff::{ParameterChange, ParameterDiff};
use crate::ecu_file::{EcuFamily, EcuFile};
use crate::error::{Result, TuningError};
use crate::stage::StageProfile;

/// Envelope magic
pub const EXPORT_MAGIC: &[u8; 4] = b"STGX";

/// Current envelope format version
pub const EXPORT_FORMAT_VERSION: u16 = 1;

/// Content type handed to the download surface
pub const EXPORT_CONTENT_TYPE: &str = "application/octet-stream";

const HEADER_LEN: usize = 10;
const CRC_LEN: usize = 4;

/// The file an export was produced from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Uploaded file name
    pub name: String,
    /// Fingerprint assigned at upload
    pub checksum: Option<String>,
    /// Detected ECU family
    pub family: EcuFamily,
}

/// Contents of an export payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Source file
    pub source: SourceInfo,
    /// Stage identity at export time
    pub stage: StageProfile,
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    /// Parameters that deviate from baseline, in store order
    pub changes: Vec<ParameterChange>,
}

/// Bytes and name handed to the download surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested download name
    pub filename: String,
    /// Envelope bytes
    pub payload: Vec<u8>,
    /// Always [`EXPORT_CONTENT_TYPE`]
    pub content_type: &'static str,
}

impl ExportArtifact {
    /// Decode and verify the manifest carried by the payload
    pub fn manifest(&self) -> Result<ExportManifest> {
        decode_envelope(&self.payload)
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Package a diff for download, stamped with the current time
pub fn build_export(
    file: Option<&EcuFile>,
    diff: &ParameterDiff,
    stage: StageProfile,
    suffix: &str,
) -> Result<ExportArtifact> {
    build_export_at(file, diff, stage, suffix, Utc::now().to_rfc3339())
}

/// Package a diff for download with an explicit timestamp
///
/// Identical inputs give byte-identical artifacts.
pub fn build_export_at(
    file: Option<&EcuFile>,
    diff: &ParameterDiff,
    stage: StageProfile,
    suffix: &str,
    exported_at: impl Into<String>,
) -> Result<ExportArtifact> {
    let file = file.ok_or(TuningError::NoFileLoaded)?;

    let manifest = ExportManifest {
        source: SourceInfo {
            name: file.name.clone(),
            checksum: file.checksum.clone(),
            family: file.family,
        },
        stage,
        exported_at: exported_at.into(),
        changes: diff.changes.clone(),
    };
    let payload = encode_envelope(&serde_json::to_vec(&manifest)?)?;
    let filename = derive_export_name(&file.name, suffix);

    info!(file = %filename, changes = diff.change_count(), "export built");
    Ok(ExportArtifact {
        filename,
        payload,
        content_type: EXPORT_CONTENT_TYPE,
    })
}

/// Insert `suffix` before the extension of `name`
///
/// `tune.bin` becomes `tune_modified.bin`; a name without an extension gets
/// the suffix appended.
pub fn derive_export_name(name: &str, suffix: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{}{}", &name[..dot], suffix, &name[dot..]),
        _ => format!("{}{}", name, suffix),
    }
}

fn encode_envelope(manifest: &[u8]) -> Result<Vec<u8>> {
    let length = u32::try_from(manifest.len())
        .map_err(|_| TuningError::CorruptExport("manifest too large".to_string()))?;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(EXPORT_MAGIC);
    BigEndian::write_u16(&mut header[4..6], EXPORT_FORMAT_VERSION);
    BigEndian::write_u32(&mut header[6..10], length);

    let mut crc = [0u8; CRC_LEN];
    BigEndian::write_u32(&mut crc, calculate_crc(manifest));

    let mut payload = Vec::with_capacity(HEADER_LEN + manifest.len() + CRC_LEN);
    payload.extend_from_slice(&header);
    payload.extend_from_slice(manifest);
    payload.extend_from_slice(&crc);
    Ok(payload)
}

fn decode_envelope(data: &[u8]) -> Result<ExportManifest> {
    if data.len() < HEADER_LEN + CRC_LEN {
        return Err(TuningError::CorruptExport("payload too short".to_string()));
    }
    if &data[0..4] != EXPORT_MAGIC {
        return Err(TuningError::CorruptExport("bad magic".to_string()));
    }

    let version = BigEndian::read_u16(&data[4..6]);
    if version != EXPORT_FORMAT_VERSION {
        return Err(TuningError::CorruptExport(format!(
            "unsupported format version {version}"
        )));
    }

    let length = BigEndian::read_u32(&data[6..10]) as usize;
    if data.len() != HEADER_LEN + length + CRC_LEN {
        return Err(TuningError::CorruptExport("length mismatch".to_string()));
    }

    let manifest = &data[HEADER_LEN..HEADER_LEN + length];
    let expected = BigEndian::read_u32(&data[HEADER_LEN + length..]);
    let actual = calculate_crc(manifest);
    if expected != actual {
        return Err(TuningError::CorruptExport(format!(
            "CRC mismatch: expected {expected:#010x}, got {actual:#010x}"
        )));
    }

    Ok(serde_json::from_slice(manifest)?)
}

fn calculate_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
