use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from},
    GalleryClient, GalleryConfig, GalleryController, UploadFile, UploadOutcome, Uploader,
};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "gallery", about = "Upload images for flower detection and browse the results")]
struct Args {
    /// Images endpoint base, e.g. http://localhost:8080/api/images
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Config file (defaults to ./gallery.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every image known to the service
    List,
    /// Upload a batch of images and print the refreshed gallery
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print gallery statistics only
    Stats,
}

impl Args {
    fn settings(&self) -> GalleryConfig {
        let mut settings = match &self.config {
            Some(path) => load_settings_from(path),
            None => load_settings(),
        };
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        settings
    }
}

/// Reads the selected files, refusing oversized selections before any file
/// is loaded into memory.
async fn read_selection(uploader: &Uploader, paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    uploader
        .check_capacity(paths.len())
        .with_context(|| format!("select at most {} images", uploader.max_files()))?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("cannot upload {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let settings = args.settings();

    let client = Arc::new(
        GalleryClient::new(&settings).context("failed to configure gallery client")?,
    );
    tracing::info!(base_url = client.base_url(), "gallery: using images endpoint");

    let mut gallery = GalleryController::new(client.clone());
    gallery.initialize().await;

    match args.command {
        Command::List => {
            print!("{}", render::records(&gallery));
            print!("{}", render::stats(&gallery.stats()));
        }
        Command::Stats => {
            print!("{}", render::stats(&gallery.stats()));
        }
        Command::Upload { paths } => {
            let mut uploader = Uploader::from_config(&settings);
            let files = read_selection(&uploader, &paths).await?;
            println!("{}", render::selection(&files));

            match uploader.submit(client.as_ref(), files).await {
                UploadOutcome::Succeeded(records) => {
                    println!("Uploaded {} image(s).", records.len());
                    gallery.upload_completed(records);
                }
                UploadOutcome::Failed(_) => {
                    if let Some(message) = uploader.error() {
                        eprintln!("{message}");
                    }
                }
                UploadOutcome::Ignored | UploadOutcome::Busy => {}
            }
            print!("{}", render::records(&gallery));
            print!("{}", render::stats(&gallery.stats()));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
