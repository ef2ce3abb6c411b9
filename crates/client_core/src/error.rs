use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// Network failure, non-2xx status, or an undecodable response body.
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("You can only upload up to {max} images at once.")]
    CapacityExceeded { max: usize, selected: usize },
    #[error("invalid gallery base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to read upload file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GalleryError {
    pub fn transport(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
