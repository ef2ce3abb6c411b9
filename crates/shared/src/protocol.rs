use serde::{Deserialize, Serialize};

use crate::domain::ImageRecord;

/// Path suffix of the list-all endpoint, relative to the images base URL.
pub const LIST_ALL_PATH: &str = "all";
/// Path suffix of the batch upload endpoint, relative to the images base URL.
pub const UPLOAD_PATH: &str = "upload";
/// Multipart field name every uploaded file is attached under.
pub const UPLOAD_FIELD_NAME: &str = "files";

/// Response body shared by both endpoints: `{ "data": [ImageRecord, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub data: Vec<ImageRecord>,
}

impl ImagesResponse {
    pub fn new(data: Vec<ImageRecord>) -> Self {
        Self { data }
    }

    pub fn into_records(self) -> Vec<ImageRecord> {
        self.data
    }
}
