//! Screenshot capture and filing — public API.
//!
//! This module owns everything between "a capture was requested for this URL"
//! and "a PNG exists on disk": target-directory creation, filename assembly
//! (sanitized name + timestamp), same-second collision handling, and the
//! actual screen grab behind the [`ScreenGrabber`] seam.

mod screenshot;

pub use screenshot::{capture_virtual_desktop, CaptureError, ScreenGrabber, XcapGrabber};

use crate::sanitize::sanitize;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp segment of every capture filename, to whole seconds.
pub const TIMESTAMP_FORMAT: &str = "%H.%M.%S.%d.%B.%Y";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Failed to prepare target directory: {0}")]
    Directory(#[from] std::io::Error),

    #[error("Failed to write image: {0}")]
    Write(#[from] image::ImageError),
}

/// Takes a fresh full-desktop screenshot and files it under `dir` with a
/// name derived from `url`. Creates `dir` if missing; returns the path of
/// the written PNG.
pub fn save_capture(
    grabber: &dyn ScreenGrabber,
    dir: &Path,
    url: &str,
) -> Result<PathBuf, SaveError> {
    fs::create_dir_all(dir)?;

    let image = grabber.grab()?;
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let path = output_path(dir, &sanitize(url), &timestamp);

    image.save(&path)?;
    log::info!("Saved capture for {url:?} to {}", path.display());
    Ok(path)
}

/// Picks the output path for one capture.
///
/// Timestamps resolve to whole seconds, so two rapid captures can land on the
/// same name; a numeric suffix (`….2.png`, `….3.png`) keeps the second write
/// from clobbering the first. An empty sanitized stem falls back to `unknown`.
pub fn output_path(dir: &Path, stem: &str, timestamp: &str) -> PathBuf {
    let stem = if stem.is_empty() { "unknown" } else { stem };
    let mut path = dir.join(format!("{stem}.{timestamp}.png"));
    let mut seq = 2u32;
    while path.exists() {
        path = dir.join(format!("{stem}.{timestamp}.{seq}.png"));
        seq += 1;
    }
    path
}
