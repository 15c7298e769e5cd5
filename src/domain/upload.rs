//! X-ray file intake.
//!
//! Only the file boundary is handled here: type and size checks, an inline
//! preview for raster images, and a content fingerprint. Pixel data is never
//! decoded and DICOM files are accepted as opaque blobs.

use base64::engine::general_purpose;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// MIME types accepted for upload.
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "application/dicom"];

/// Message shown when an upload has the wrong type.
pub const UNSUPPORTED_TYPE_MESSAGE: &str =
    "Please upload a valid X-ray image (JPEG, PNG) or DICOM file";

/// Reasons an upload is rejected before it reaches the analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{UNSUPPORTED_TYPE_MESSAGE}")]
    UnsupportedType { name: String, mime: Option<String> },

    #[error("File is empty: {0}")]
    Empty(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}

/// An accepted X-ray upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XrayFile {
    pub name: String,
    /// Declared or inferred MIME type (`None` for an unknown `.dcm` upload)
    pub mime: Option<String>,
    pub size_bytes: u64,
    /// SHA-256 of the file content, hex encoded
    pub sha256: String,
    /// `data:` URL for image previews; `None` for DICOM
    pub preview: Option<String>,
}

impl XrayFile {
    /// Validate an upload and build its preview.
    ///
    /// # Errors
    /// Returns error if the type is not an accepted image/DICOM type, the file
    /// is empty, or it exceeds `max_bytes`.
    pub fn accept(
        name: &str,
        mime: Option<&str>,
        bytes: &[u8],
        max_bytes: u64,
    ) -> Result<Self, UploadError> {
        if !is_accepted(name, mime) {
            return Err(UploadError::UnsupportedType {
                name: name.to_string(),
                mime: mime.map(str::to_string),
            });
        }

        let size = bytes.len() as u64;
        if size == 0 {
            return Err(UploadError::Empty(name.to_string()));
        }
        if size > max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        let preview = match mime {
            Some(m) if m.starts_with("image/") => Some(format!(
                "data:{};base64,{}",
                m,
                general_purpose::STANDARD.encode(bytes)
            )),
            _ => None,
        };

        Ok(Self {
            name: name.to_string(),
            mime: mime.map(str::to_string),
            size_bytes: size,
            sha256: fingerprint(bytes),
            preview,
        })
    }

    /// Whether the upload is a DICOM file.
    #[must_use]
    pub fn is_dicom(&self) -> bool {
        self.mime.as_deref() == Some("application/dicom") || has_dicom_extension(&self.name)
    }

    /// Short fingerprint for display.
    #[must_use]
    pub fn short_fingerprint(&self) -> &str {
        &self.sha256[..12.min(self.sha256.len())]
    }
}

/// Infer a MIME type from a file name, for uploads that arrive without one.
#[must_use]
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    let ext = lower.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "dcm" => Some("application/dicom"),
        _ => None,
    }
}

fn is_accepted(name: &str, mime: Option<&str>) -> bool {
    mime.is_some_and(|m| ACCEPTED_MIME_TYPES.contains(&m)) || has_dicom_extension(name)
}

fn has_dicom_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".dcm")
}

fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
