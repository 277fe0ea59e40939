//! Resident ECU file record

use serde::{Deserialize, Serialize};
use std::fmt;

/// ECU family recognized from the vendor marker in the file header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcuFamily {
    /// Bosch EDC17 diesel controller
    BoschEdc17,
    /// Siemens SID controller
    SiemensSid,
    /// Delphi DCM controller
    DelphiDcm,
    /// No vendor marker found
    #[default]
    Unknown,
}

impl EcuFamily {
    /// Whether the family was recognized
    pub fn is_known(self) -> bool {
        self != EcuFamily::Unknown
    }
}

impl fmt::Display for EcuFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EcuFamily::BoschEdc17 => "Bosch EDC17",
            EcuFamily::SiemensSid => "Siemens SID",
            EcuFamily::DelphiDcm => "Delphi DCM",
            EcuFamily::Unknown => "Unknown ECU",
        };
        f.write_str(s)
    }
}

/// An accepted ECU image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcuFile {
    /// File name as uploaded
    pub name: String,
    /// Payload size in bytes
    pub size: u64,
    /// MIME type reported by the uploader
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Acceptance timestamp (RFC 3339)
    pub uploaded_at: String,
    /// Opaque display fingerprint
    pub checksum: Option<String>,
    /// Detected ECU family
    #[serde(default)]
    pub family: EcuFamily,
}

/// Where the session is in the file lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    /// No file has been accepted yet
    None,
    /// An upload is being decoded
    Uploading,
    /// A file is resident and editable
    Ready,
}
