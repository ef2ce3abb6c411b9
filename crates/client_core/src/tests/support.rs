//! In-memory `ImageService` used by the controller and uploader tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{ImageId, ImageRecord},
    protocol::ImagesResponse,
};

use crate::{error::GalleryError, ImageService, UploadFile};

pub fn record(id: &str, flowers: u64, minute: u32) -> ImageRecord {
    ImageRecord {
        id: ImageId::from(id),
        image_url: format!("http://cdn.local/{id}.jpg"),
        image_name: format!("{id}.jpg"),
        number_of_flowers: flowers,
        date_created: Utc.with_ymd_and_hms(2024, 4, 20, 10, minute, 0).unwrap(),
    }
}

pub fn files(count: usize) -> Vec<UploadFile> {
    (0..count)
        .map(|i| UploadFile::new(format!("bloom-{i}.jpg"), vec![i as u8; 4]))
        .collect()
}

pub struct FakeImageService {
    listing: Option<Vec<ImageRecord>>,
    upload_result: Option<Vec<ImageRecord>>,
    pub list_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub uploaded_names: Mutex<Vec<Vec<String>>>,
}

impl FakeImageService {
    pub fn new() -> Self {
        Self {
            listing: Some(Vec::new()),
            upload_result: Some(Vec::new()),
            list_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            uploaded_names: Mutex::new(Vec::new()),
        }
    }

    pub fn with_listing(mut self, records: Vec<ImageRecord>) -> Self {
        self.listing = Some(records);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing = None;
        self
    }

    pub fn with_upload_result(mut self, records: Vec<ImageRecord>) -> Self {
        self.upload_result = Some(records);
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.upload_result = None;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageService for FakeImageService {
    async fn fetch_all_images(&self) -> Result<ImagesResponse, GalleryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listing
            .clone()
            .map(ImagesResponse::new)
            .ok_or_else(|| GalleryError::transport("list_all", "connection refused"))
    }

    async fn upload_batch(&self, files: Vec<UploadFile>) -> Result<ImagesResponse, GalleryError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded_names
            .lock()
            .expect("uploaded names lock")
            .push(files.into_iter().map(|file| file.file_name).collect());
        self.upload_result
            .clone()
            .map(ImagesResponse::new)
            .ok_or_else(|| GalleryError::transport("upload", "503 Service Unavailable"))
    }
}
