//! Parkinsight client core: scan submission to an external prediction
//! service, canonical result normalization, and a durable local store for
//! user-saved analysis results.

pub mod analysis;
pub mod config;
pub mod models;
pub mod predict;
pub mod progress;
pub mod session;
pub mod store;

pub use analysis::{submit_scan, AnalysisError, ScanSubmission};
pub use models::{
    AnalysisResult, Diagnosis, Gender, PatientInfo, SavedResult, ScanImage, ScanType,
};
pub use predict::{map_label_to_diagnosis, PredictClient, PredictError, PredictTransport};
pub use session::{ClearConfirmation, ResultSession, SaveState, SessionError};
pub use store::ResultStore;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedding applications.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
