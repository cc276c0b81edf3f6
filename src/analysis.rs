//! Result Submission Flow: validate → dispatch → normalize.
//!
//! Takes the patient details, scan type and image, sends them through a
//! [`PredictTransport`], and produces one canonical [`AnalysisResult`].
//! Validation always precedes the network call; nothing is persisted here —
//! saving is an explicit, separate user action on the session.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::models::{AnalysisResult, PatientInfo, ScanImage, ScanType};
use crate::predict::{map_label_to_diagnosis, PredictError, PredictTransport};

/// Accepted patient age range, matching the intake form bounds.
const MIN_AGE: u32 = 1;
const MAX_AGE: u32 = 120;

/// Errors from one submission.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required field is missing or out of range. Raised before any
    /// network traffic; the user corrects the input and retries.
    #[error("Missing information: {0}")]
    Validation(String),

    /// The backend was unreachable, answered non-2xx, or returned a
    /// malformed body. No retry, no partial result.
    #[error("Analysis failed: {0}")]
    Failed(#[from] PredictError),
}

/// One scan submission: patient details, scan type, and the uploaded image.
#[derive(Debug, Clone)]
pub struct ScanSubmission {
    pub patient: PatientInfo,
    pub scan_type: ScanType,
    pub image: Option<ScanImage>,
}

/// Submit a scan and produce the canonical analysis result.
///
/// The reported `processing_time` is the measured wall-clock duration of
/// the prediction call, formatted for display.
pub fn submit_scan<T: PredictTransport>(
    transport: &T,
    submission: &ScanSubmission,
) -> Result<AnalysisResult, AnalysisError> {
    let image = validate(submission)?;

    tracing::info!(
        scan_type = submission.scan_type.as_str(),
        image = %image.file_name,
        "Submitting scan for analysis"
    );

    let started = Instant::now();
    let label = transport.predict(submission.scan_type, &submission.patient, image)?;
    let elapsed = started.elapsed();

    let diagnosis = map_label_to_diagnosis(&label);
    tracing::info!(
        scan_type = submission.scan_type.as_str(),
        diagnosis = diagnosis.as_str(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Analysis complete"
    );

    Ok(AnalysisResult {
        success: true,
        diagnosis,
        processing_time: format_processing_time(elapsed),
        scan_type: submission.scan_type,
        patient_info: submission.patient.clone(),
        image_url: String::new(),
    })
}

/// Validate every required field before the backend is contacted.
fn validate(submission: &ScanSubmission) -> Result<&ScanImage, AnalysisError> {
    if submission.patient.name.trim().is_empty() {
        return Err(AnalysisError::Validation("First name is required".into()));
    }
    if submission.patient.surname.trim().is_empty() {
        return Err(AnalysisError::Validation("Last name is required".into()));
    }
    if submission.patient.age < MIN_AGE || submission.patient.age > MAX_AGE {
        return Err(AnalysisError::Validation(format!(
            "Age must be between {MIN_AGE} and {MAX_AGE}"
        )));
    }

    let image = submission
        .image
        .as_ref()
        .ok_or_else(|| AnalysisError::Validation("A scan image is required".into()))?;
    if image.bytes.is_empty() {
        return Err(AnalysisError::Validation("The scan image is empty".into()));
    }

    Ok(image)
}

/// Display string for a measured duration, e.g. "3.4 seconds".
fn format_processing_time(elapsed: Duration) -> String {
    format!("{:.1} seconds", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diagnosis, Gender};
    use crate::predict::{MockOutcome, MockTransport};

    fn submission() -> ScanSubmission {
        ScanSubmission {
            patient: PatientInfo {
                name: "Jane".into(),
                surname: "Doe".into(),
                age: 63,
                gender: Gender::Female,
            },
            scan_type: ScanType::Mri,
            image: Some(ScanImage::new("scan.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])),
        }
    }

    #[test]
    fn valid_submission_produces_detected_result() {
        let mock = MockTransport::with_label("Parkinson");
        let result = submit_scan(&mock, &submission()).unwrap();

        assert!(result.success);
        assert_eq!(result.diagnosis, Diagnosis::Detected);
        assert_eq!(result.scan_type, ScanType::Mri);
        assert_eq!(result.patient_info.name, "Jane");
        assert!(result.image_url.is_empty());
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn normalization_goes_through_central_mapping() {
        for (label, expected) in [
            ("PARKINSON", Diagnosis::Detected),
            ("parkinson", Diagnosis::Detected),
            ("Healthy", Diagnosis::NotDetected),
        ] {
            let mock = MockTransport::with_label(label);
            let result = submit_scan(&mock, &submission()).unwrap();
            assert_eq!(result.diagnosis, expected, "label {label:?}");
        }
    }

    #[test]
    fn missing_image_blocks_network_call() {
        let mock = MockTransport::with_label("Parkinson");
        let mut sub = submission();
        sub.image = None;

        let err = submit_scan(&mock, &sub).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn blank_name_blocks_network_call() {
        let mock = MockTransport::with_label("Parkinson");
        let mut sub = submission();
        sub.patient.name = "   ".into();

        let err = submit_scan(&mock, &sub).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn out_of_range_age_blocks_network_call() {
        for age in [0, 121, 500] {
            let mock = MockTransport::with_label("Parkinson");
            let mut sub = submission();
            sub.patient.age = age;

            let err = submit_scan(&mock, &sub).unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(_)), "age {age}");
            assert_eq!(mock.calls(), 0);
        }
    }

    #[test]
    fn empty_image_bytes_block_network_call() {
        let mock = MockTransport::with_label("Parkinson");
        let mut sub = submission();
        sub.image = Some(ScanImage::new("scan.jpg", vec![]));

        let err = submit_scan(&mock, &sub).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn backend_status_failure_surfaces_as_analysis_failed() {
        let mock = MockTransport::with_outcome(MockOutcome::Status(500, "model crashed".into()));
        let err = submit_scan(&mock, &submission()).unwrap_err();
        match err {
            AnalysisError::Failed(PredictError::BackendStatus { status, .. }) => {
                assert_eq!(status, 500)
            }
            other => panic!("Expected Failed(BackendStatus), got: {other}"),
        }
    }

    #[test]
    fn unreachable_backend_surfaces_as_analysis_failed() {
        let mock = MockTransport::with_outcome(MockOutcome::Unreachable);
        let err = submit_scan(&mock, &submission()).unwrap_err();
        assert!(matches!(err, AnalysisError::Failed(_)));
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn processing_time_is_a_display_duration() {
        assert_eq!(
            format_processing_time(Duration::from_millis(3400)),
            "3.4 seconds"
        );
        assert_eq!(
            format_processing_time(Duration::from_millis(50)),
            "0.1 seconds"
        );
    }
}
