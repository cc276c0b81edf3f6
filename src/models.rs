//! Canonical data model: scan categories, patient details, and the
//! transient/saved result shapes shared by the submission flow, the
//! lifecycle controller, and the persistent store.
//!
//! Serialized field names follow the persisted wire format exactly
//! (camelCase keys, kebab-case enum strings), so a saved-results file is
//! readable by any client of the same format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stored string does not match any known enum value.
#[derive(Debug, Error)]
#[error("Invalid value for {field}: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern,
/// serialized as its wire string.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ScanType {
    Mri => "mri",
    Spiral => "spiral",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
    PreferNotToSay => "prefer-not-to-say",
});

str_enum!(Diagnosis {
    Detected => "detected",
    NotDetected => "not-detected",
});

impl ScanType {
    /// Display name of the specialized model behind this scan type.
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Mri => "Parkinsons Detect-MRI",
            Self::Spiral => "Parkinsons Detect-Spiral",
        }
    }

    /// Accepted upload formats, shown next to the file picker.
    pub fn upload_description(&self) -> &'static str {
        match self {
            Self::Mri => "Brain MRI scan (JPEG, PNG, or DICOM format)",
            Self::Spiral => "Spiral imaging scan (JPEG, PNG format)",
        }
    }

    /// Whether the prediction request for this scan type also carries the
    /// patient fields. The MRI endpoint accepts them; the spiral endpoint
    /// takes the image alone.
    pub fn sends_patient_fields(&self) -> bool {
        matches!(self, Self::Mri)
    }
}

// ═══════════════════════════════════════════
// Patient & image
// ═══════════════════════════════════════════

/// Patient details entered alongside a scan upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub surname: String,
    pub age: u32,
    pub gender: Gender,
}

/// In-session scan image: raw bytes plus the original file name.
///
/// This is the explicit handoff between the submission flow and the
/// lifecycle controller. It lives only for the current session; saving a
/// result materializes it into a self-contained data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ScanImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

// ═══════════════════════════════════════════
// Results
// ═══════════════════════════════════════════

/// One analysis outcome, produced by a single submission.
///
/// Transient: held in memory for the current session only. `image_url` is
/// empty until the result is saved (the backend does not echo the image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub success: bool,
    pub diagnosis: Diagnosis,
    pub processing_time: String,
    pub scan_type: ScanType,
    pub patient_info: PatientInfo,
    pub image_url: String,
}

/// A user-retained result as persisted in the saved-results file.
///
/// `image_url` is always a self-contained `data:` URL here — a saved result
/// must render without any process-lifetime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResult {
    pub id: String,
    pub saved_at: String,
    pub success: bool,
    pub diagnosis: Diagnosis,
    pub processing_time: String,
    pub scan_type: ScanType,
    pub patient_info: PatientInfo,
    pub image_url: String,
}
