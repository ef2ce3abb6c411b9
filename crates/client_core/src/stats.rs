use chrono::{DateTime, Utc};
use shared::domain::ImageRecord;

const FILE_SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GalleryStats {
    pub total_images: usize,
    pub total_flowers: u64,
    pub last_upload: Option<DateTime<Utc>>,
}

impl GalleryStats {
    pub fn compute<'a>(records: impl IntoIterator<Item = &'a ImageRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut stats, record| {
                stats.total_images += 1;
                stats.total_flowers += record.number_of_flowers;
                stats.last_upload = stats.last_upload.max(Some(record.date_created));
                stats
            })
    }

    /// Calendar date of the most recent record, or `N/A` for an empty gallery.
    pub fn last_upload_label(&self) -> String {
        self.last_upload
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < FILE_SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{scaled:.2}");
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{rounded} {}", FILE_SIZE_UNITS[unit])
}
