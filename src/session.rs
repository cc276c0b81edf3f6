//! Result presentation & lifecycle controller.
//!
//! Mediates between one in-session result and the persistent store: save
//! (promote the transient result to a durable one), view, delete, and the
//! confirmation-gated clear-all. The in-flight result is explicit state on
//! [`ResultSession`], handed over from the submission flow as a return
//! value — there is no global slot.

use base64::Engine as _;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AnalysisResult, SavedResult, ScanImage};
use crate::store::ResultStore;

/// Save lifecycle of the currently displayed result.
///
/// `Unsaved → Saving → Saved` (terminal), or `Unsaved → Saving →
/// SaveFailed` with retry going back through `save()`. There is no
/// transition out of `Saved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Unsaved,
    Saving,
    Saved,
    SaveFailed,
}

/// Explicit confirmation for the destructive clear-all. The guard lives
/// here in the calling layer; the store's `clear` has no confirmation
/// semantics of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearConfirmation {
    Confirmed,
    Cancelled,
}

/// Errors from session lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No result is currently displayed")]
    NoCurrentResult,

    #[error("This result has already been saved")]
    AlreadySaved,

    #[error("Failed to save result: {0}")]
    SaveFailed(String),

    #[error("Clearing all saved results requires confirmation")]
    NotConfirmed,
}

/// The result currently on display, with its save lifecycle.
struct CurrentResult {
    result: AnalysisResult,
    /// Raw scan bytes for a freshly analyzed result; absent when the
    /// displayed result was loaded from the store (its image is already a
    /// self-contained data URL).
    image: Option<ScanImage>,
    state: SaveState,
    saved_id: Option<String>,
}

/// Session controller owning the store and the displayed result.
pub struct ResultSession {
    store: ResultStore,
    current: Option<CurrentResult>,
}

impl ResultSession {
    pub fn new(store: ResultStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Session over the default store location.
    pub fn open_default() -> Self {
        Self::new(ResultStore::open_default())
    }

    /// Display a freshly produced analysis result.
    pub fn present(&mut self, result: AnalysisResult, image: ScanImage) {
        self.current = Some(CurrentResult {
            result,
            image: Some(image),
            state: SaveState::Unsaved,
            saved_id: None,
        });
    }

    /// Display a result loaded from the store. Already saved; a further
    /// save is refused.
    pub fn present_saved(&mut self, saved: SavedResult) {
        let id = saved.id.clone();
        self.current = Some(CurrentResult {
            result: AnalysisResult {
                success: saved.success,
                diagnosis: saved.diagnosis,
                processing_time: saved.processing_time,
                scan_type: saved.scan_type,
                patient_info: saved.patient_info,
                image_url: saved.image_url,
            },
            image: None,
            state: SaveState::Saved,
            saved_id: Some(id),
        });
    }

    /// The result currently on display, if any.
    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref().map(|c| &c.result)
    }

    /// Save lifecycle of the displayed result.
    pub fn save_state(&self) -> Option<SaveState> {
        self.current.as_ref().map(|c| c.state)
    }

    /// Promote the displayed result to a saved one: materialize the image
    /// into a data URL, assign a fresh id and timestamp, and append it to
    /// the store.
    ///
    /// A second save of an already-saved result is refused. A failed save
    /// leaves the result in `SaveFailed` and may be retried.
    pub fn save(&mut self) -> Result<SavedResult, SessionError> {
        let current = self
            .current
            .as_mut()
            .ok_or(SessionError::NoCurrentResult)?;
        if current.state == SaveState::Saved {
            return Err(SessionError::AlreadySaved);
        }

        current.state = SaveState::Saving;

        let image = match current.image.as_ref() {
            Some(image) => image,
            None => {
                current.state = SaveState::SaveFailed;
                return Err(SessionError::SaveFailed(
                    "No image data for the displayed result".into(),
                ));
            }
        };
        let image_url = match encode_data_url(image) {
            Ok(url) => url,
            Err(e) => {
                current.state = SaveState::SaveFailed;
                return Err(e);
            }
        };

        let saved = SavedResult {
            id: Uuid::new_v4().to_string(),
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            success: current.result.success,
            diagnosis: current.result.diagnosis,
            processing_time: current.result.processing_time.clone(),
            scan_type: current.result.scan_type,
            patient_info: current.result.patient_info.clone(),
            image_url,
        };

        self.store.append(&saved);

        current.state = SaveState::Saved;
        current.saved_id = Some(saved.id.clone());
        current.result.image_url = saved.image_url.clone();

        tracing::info!(id = %saved.id, "Result saved");
        Ok(saved)
    }

    /// All saved results, in saved order.
    pub fn list_saved(&self) -> Vec<SavedResult> {
        self.store.list()
    }

    /// Look up one saved result by id. `None` when the id is unknown.
    pub fn view(&self, id: &str) -> Option<SavedResult> {
        self.store.list().into_iter().find(|r| r.id == id)
    }

    /// Delete one saved result. Invalidates the display if the deleted
    /// result is the one currently shown.
    pub fn delete(&mut self, id: &str) {
        self.store.delete_by_id(id);
        if self
            .current
            .as_ref()
            .and_then(|c| c.saved_id.as_deref())
            .is_some_and(|current_id| current_id == id)
        {
            self.current = None;
        }
    }

    /// Delete every saved result. Irreversible; refuses to act without an
    /// explicit confirmation.
    pub fn clear_all(&mut self, confirmation: ClearConfirmation) -> Result<(), SessionError> {
        if confirmation != ClearConfirmation::Confirmed {
            return Err(SessionError::NotConfirmed);
        }
        self.store.clear();
        if self
            .current
            .as_ref()
            .is_some_and(|c| c.state == SaveState::Saved)
        {
            self.current = None;
        }
        tracing::info!("All saved results cleared");
        Ok(())
    }
}

/// Materialize scan bytes into a self-contained `data:` URL.
///
/// The MIME type comes from the uploaded file name; unrecognized
/// extensions fall back to octet-stream rather than failing.
fn encode_data_url(image: &ScanImage) -> Result<String, SessionError> {
    if image.bytes.is_empty() {
        return Err(SessionError::SaveFailed(
            "The scan image has no data".into(),
        ));
    }
    let mime = mime_guess::from_path(&image.file_name).first_or_octet_stream();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    Ok(format!("data:{};base64,{encoded}", mime.essence_str()))
}
