//! Upload session workflow: count validation, a single in-flight batch upload,
//! and the dismissible error message shown to the user.

use shared::{domain::ImageRecord, protocol::ImagesResponse};
use tracing::{debug, error, warn};

use crate::{config::GalleryConfig, error::GalleryError, ImageService, UploadFile};

pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading images. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Validating,
    Uploading,
    Succeeded,
    Failed,
}

/// One entry of a drop event. Only files take part in an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedItem {
    File(UploadFile),
    Text(String),
    Uri(String),
}

/// Terminal result of one upload attempt, reported to the gallery.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Nothing to upload; the session stayed idle.
    Ignored,
    /// An upload is already in flight; the attempt was refused.
    Busy,
    Succeeded(Vec<ImageRecord>),
    Failed(GalleryError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// What the caller must do after [`Uploader::begin`].
#[derive(Debug)]
pub enum UploadAttempt {
    /// Send these files with exactly one `upload_batch` call, then report the
    /// result through [`Uploader::finish`].
    Send(Vec<UploadFile>),
    Resolved(UploadOutcome),
}

#[derive(Debug)]
pub struct Uploader {
    max_files: usize,
    phase: UploadPhase,
    error: Option<String>,
    dragging: bool,
    in_flight_files: usize,
}

impl Uploader {
    pub fn new(max_files: usize) -> Self {
        Self {
            max_files,
            phase: UploadPhase::Idle,
            error: None,
            dragging: false,
            in_flight_files: 0,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.max_files_per_upload)
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// The file input is disabled while this is true.
    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    pub fn in_flight_files(&self) -> usize {
        self.in_flight_files
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Validates a selection size without touching the session, so callers
    /// can reject oversized selections before reading any file contents.
    pub fn check_capacity(&self, selected: usize) -> Result<(), GalleryError> {
        if selected > self.max_files {
            return Err(GalleryError::CapacityExceeded {
                max: self.max_files,
                selected,
            });
        }
        Ok(())
    }

    pub fn begin(&mut self, files: Vec<UploadFile>) -> UploadAttempt {
        if self.is_uploading() {
            warn!(
                in_flight_files = self.in_flight_files,
                "uploader: refusing new attempt while an upload is in flight"
            );
            return UploadAttempt::Resolved(UploadOutcome::Busy);
        }
        if files.is_empty() {
            debug!("uploader: empty selection ignored");
            return UploadAttempt::Resolved(UploadOutcome::Ignored);
        }

        self.error = None;
        self.transition(UploadPhase::Validating);

        if let Err(err) = self.check_capacity(files.len()) {
            warn!(selected = files.len(), max = self.max_files, "uploader: selection too large");
            self.error = Some(err.to_string());
            self.transition(UploadPhase::Failed);
            self.transition(UploadPhase::Idle);
            return UploadAttempt::Resolved(UploadOutcome::Failed(err));
        }

        self.in_flight_files = files.len();
        self.transition(UploadPhase::Uploading);
        UploadAttempt::Send(files)
    }

    pub fn finish(&mut self, result: Result<ImagesResponse, GalleryError>) -> UploadOutcome {
        if !self.is_uploading() {
            warn!(phase = ?self.phase, "uploader: completion received without an upload in flight");
        }
        self.in_flight_files = 0;

        match result {
            Ok(response) => {
                self.transition(UploadPhase::Succeeded);
                self.transition(UploadPhase::Idle);
                UploadOutcome::Succeeded(response.into_records())
            }
            Err(err) => {
                error!(error = %err, "uploader: error uploading images");
                self.error = Some(UPLOAD_FAILED_MESSAGE.to_string());
                self.transition(UploadPhase::Failed);
                self.transition(UploadPhase::Idle);
                UploadOutcome::Failed(err)
            }
        }
    }

    /// Runs a whole attempt for a file-input selection.
    pub async fn submit(
        &mut self,
        service: &dyn ImageService,
        files: Vec<UploadFile>,
    ) -> UploadOutcome {
        match self.begin(files) {
            UploadAttempt::Resolved(outcome) => outcome,
            UploadAttempt::Send(files) => {
                let result = service.upload_batch(files).await;
                self.finish(result)
            }
        }
    }

    /// Runs a whole attempt for a drop event; non-file items are discarded.
    pub async fn on_drop(
        &mut self,
        service: &dyn ImageService,
        items: Vec<DroppedItem>,
    ) -> UploadOutcome {
        self.dragging = false;
        let total = items.len();
        let files: Vec<UploadFile> = items
            .into_iter()
            .filter_map(|item| match item {
                DroppedItem::File(file) => Some(file),
                DroppedItem::Text(_) | DroppedItem::Uri(_) => None,
            })
            .collect();
        if files.len() < total {
            debug!(
                discarded = total - files.len(),
                "uploader: ignoring non-file drop items"
            );
        }
        self.submit(service, files).await
    }

    fn transition(&mut self, next: UploadPhase) {
        debug!(from = ?self.phase, to = ?next, "uploader: phase change");
        self.phase = next;
    }
}

#[cfg(test)]
#[path = "tests/uploader_tests.rs"]
mod tests;
