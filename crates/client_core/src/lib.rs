use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{ImagesResponse, LIST_ALL_PATH, UPLOAD_FIELD_NAME, UPLOAD_PATH};
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod gallery;
pub mod stats;
pub mod uploader;

pub use config::GalleryConfig;
pub use error::GalleryError;
pub use gallery::{GalleryController, GalleryEvent};
pub use stats::{format_file_size, GalleryStats};
pub use uploader::{DroppedItem, UploadAttempt, UploadOutcome, UploadPhase, Uploader};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file blob selected or dropped by the user, ready to be attached to a
/// batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub async fn from_path(path: &Path) -> Result<Self, GalleryError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| GalleryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn into_part(self) -> Result<Part, reqwest::Error> {
        let mime_type = self
            .mime_type
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&mime_type)
    }
}

/// The two operations the detection service exposes to the gallery.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn fetch_all_images(&self) -> Result<ImagesResponse, GalleryError>;
    async fn upload_batch(&self, files: Vec<UploadFile>) -> Result<ImagesResponse, GalleryError>;
}

pub struct GalleryClient {
    http: Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(config: &GalleryConfig) -> Result<Self, GalleryError> {
        let base_url = config.normalized_base_url()?;
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GalleryError::transport("client setup", e))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.base_url)
    }

    async fn read_images_response(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<ImagesResponse, reqwest::Error> {
        let body: ImagesResponse = response.error_for_status()?.json().await?;
        info!(operation, records = body.data.len(), "gallery: request completed");
        Ok(body)
    }
}

#[async_trait]
impl ImageService for GalleryClient {
    async fn fetch_all_images(&self) -> Result<ImagesResponse, GalleryError> {
        let url = self.endpoint(LIST_ALL_PATH);
        let result = async {
            let response = self.http.get(&url).send().await?;
            Self::read_images_response("list_all", response).await
        }
        .await;

        result.map_err(|err| {
            error!(url = %url, error = %err, "gallery: error fetching images");
            GalleryError::transport("list_all", err)
        })
    }

    async fn upload_batch(&self, files: Vec<UploadFile>) -> Result<ImagesResponse, GalleryError> {
        let url = self.endpoint(UPLOAD_PATH);
        let file_count = files.len();
        let result = async {
            let mut form = Form::new();
            for file in files {
                form = form.part(UPLOAD_FIELD_NAME, file.into_part()?);
            }
            let response = self.http.post(&url).multipart(form).send().await?;
            Self::read_images_response("upload", response).await
        }
        .await;

        result.map_err(|err| {
            error!(
                url = %url,
                file_count,
                error = %err,
                "gallery: error uploading batch images"
            );
            GalleryError::transport("upload", err)
        })
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
