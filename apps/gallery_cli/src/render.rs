//! Plain-text rendering of gallery state for the terminal.

use std::fmt::Write as _;

use client_core::{format_file_size, GalleryController, GalleryStats, UploadFile};
use shared::domain::ImageRecord;

pub fn records(gallery: &GalleryController) -> String {
    if gallery.is_empty() {
        return "No images uploaded yet. Start by adding some!\n".to_string();
    }
    let mut out = String::new();
    for record in gallery.records() {
        out.push_str(&record_line(record));
        out.push('\n');
    }
    out
}

pub fn record_line(record: &ImageRecord) -> String {
    format!(
        "[{}] {}  {} flowers  {}  {}",
        record.id,
        record.image_name,
        record.number_of_flowers,
        record.date_created.format("%Y-%m-%d %H:%M:%S"),
        record.image_url
    )
}

pub fn stats(stats: &GalleryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Images: {}", stats.total_images);
    let _ = writeln!(out, "Total Flowers Detected: {}", stats.total_flowers);
    let _ = writeln!(out, "Last Upload: {}", stats.last_upload_label());
    out
}

pub fn selection(files: &[UploadFile]) -> String {
    let total: u64 = files.iter().map(UploadFile::size_bytes).sum();
    format!(
        "Selected {} file(s), {}",
        files.len(),
        format_file_size(total)
    )
}
