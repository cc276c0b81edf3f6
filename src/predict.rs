//! HTTP boundary to the external prediction service.
//!
//! The service exposes `POST /predict/<scan-type>/` taking a multipart body
//! with a binary `image` field and answering JSON `{ "prediction": <label> }`.
//! Everything behind that endpoint is an opaque collaborator; this module
//! only speaks its wire contract and maps the raw label into the canonical
//! diagnosis through one shared function.

use serde::Deserialize;
use thiserror::Error;

use crate::config;
use crate::models::{Diagnosis, PatientInfo, ScanImage, ScanType};

/// The raw backend label that means a positive finding.
/// Matching is case-insensitive; every other label maps to not-detected.
const POSITIVE_LABEL: &str = "parkinson";

/// Map a raw backend label to the canonical diagnosis.
///
/// The single mapping used for every scan type — endpoints must not grow
/// their own copies.
pub fn map_label_to_diagnosis(raw: &str) -> Diagnosis {
    if raw.trim().eq_ignore_ascii_case(POSITIVE_LABEL) {
        Diagnosis::Detected
    } else {
        Diagnosis::NotDetected
    }
}

/// Errors from the prediction boundary.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Cannot reach prediction service at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Prediction service responded with status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Failed to parse prediction response: {0}")]
    ResponseParsing(String),
}

/// Transport seam for the submission flow.
///
/// The real client talks HTTP; tests substitute a mock that records
/// invocations, so "no network call on validation failure" is verifiable.
pub trait PredictTransport {
    /// Submit one scan image and return the raw prediction label.
    fn predict(
        &self,
        scan_type: ScanType,
        patient: &PatientInfo,
        image: &ScanImage,
    ) -> Result<String, PredictError>;
}

/// Response body from `POST /predict/<scan-type>/`
#[derive(Deserialize)]
struct PredictResponse {
    prediction: String,
}

/// Blocking HTTP client for the prediction service.
pub struct PredictClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl PredictClient {
    /// Create a client for the given base URL with an explicit timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client for the configured service URL with the default timeout.
    pub fn from_config() -> Self {
        Self::new(&config::api_base_url(), config::DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn endpoint(&self, scan_type: ScanType) -> String {
        format!("{}/predict/{}/", self.base_url, scan_type.as_str())
    }

    fn build_form(
        &self,
        scan_type: ScanType,
        patient: &PatientInfo,
        image: &ScanImage,
    ) -> Result<reqwest::blocking::multipart::Form, PredictError> {
        let mime = mime_guess::from_path(&image.file_name).first_or_octet_stream();
        let part = reqwest::blocking::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(mime.essence_str())
            .map_err(|e| PredictError::HttpClient(e.to_string()))?;

        let mut form = reqwest::blocking::multipart::Form::new().part("image", part);

        // The MRI endpoint also accepts the patient fields; spiral takes
        // the image alone.
        if scan_type.sends_patient_fields() {
            form = form
                .text("name", patient.name.clone())
                .text("surname", patient.surname.clone())
                .text("age", patient.age.to_string())
                .text("gender", patient.gender.as_str().to_string());
        }

        Ok(form)
    }
}

impl PredictTransport for PredictClient {
    fn predict(
        &self,
        scan_type: ScanType,
        patient: &PatientInfo,
        image: &ScanImage,
    ) -> Result<String, PredictError> {
        let url = self.endpoint(scan_type);
        let form = self.build_form(scan_type, patient, image)?;

        let response = self.client.post(&url).multipart(form).send().map_err(|e| {
            if e.is_connect() {
                PredictError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                PredictError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                PredictError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PredictError::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictResponse = response
            .json()
            .map_err(|e| PredictError::ResponseParsing(e.to_string()))?;

        Ok(parsed.prediction)
    }
}

// ═══════════════════════════════════════════
// Mock transport for tests
// ═══════════════════════════════════════════

/// Outcome a [`MockTransport`] produces on each call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Respond with this raw label.
    Label(String),
    /// Fail with a non-2xx backend status.
    Status(u16, String),
    /// Fail as if the service were unreachable.
    Unreachable,
}

/// Mock prediction transport — configurable outcome, records every call.
pub struct MockTransport {
    outcome: MockOutcome,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockTransport {
    pub fn with_label(label: &str) -> Self {
        Self {
            outcome: MockOutcome::Label(label.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of predict calls made against this transport.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl PredictTransport for MockTransport {
    fn predict(
        &self,
        _scan_type: ScanType,
        _patient: &PatientInfo,
        _image: &ScanImage,
    ) -> Result<String, PredictError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Label(label) => Ok(label.clone()),
            MockOutcome::Status(status, body) => Err(PredictError::BackendStatus {
                status: *status,
                body: body.clone(),
            }),
            MockOutcome::Unreachable => {
                Err(PredictError::Connection("http://127.0.0.1:8000".into()))
            }
        }
    }
}
