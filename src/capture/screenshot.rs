//! Full virtual-desktop capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS. Every monitor is
//! grabbed and composited onto one canvas spanning the virtual desktop, so a
//! multi-monitor setup produces a single wide image.

use image::{imageops, DynamicImage, RgbaImage};
use xcap::Monitor;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitors found")]
    NoMonitors,

    #[error("Failed to read monitor geometry: {0}")]
    MonitorGeometry(String),

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),
}

/// Screen-grab seam between the HTTP handler and the OS.
///
/// The listener only ever needs "give me the desktop as an image", so tests
/// can stand in a stub and run headless while production uses [`XcapGrabber`].
pub trait ScreenGrabber: Send + Sync {
    fn grab(&self) -> Result<DynamicImage, CaptureError>;
}

/// Production grabber backed by [`capture_virtual_desktop`].
pub struct XcapGrabber;

impl ScreenGrabber for XcapGrabber {
    fn grab(&self) -> Result<DynamicImage, CaptureError> {
        capture_virtual_desktop()
    }
}

/// Captures all monitors and stitches them into one `DynamicImage` laid out
/// by each monitor's position in the virtual desktop.
pub fn capture_virtual_desktop() -> Result<DynamicImage, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
    if monitors.is_empty() {
        return Err(CaptureError::NoMonitors);
    }

    let mut shots = Vec::with_capacity(monitors.len());
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);

    for monitor in &monitors {
        let x = monitor
            .x()
            .map_err(|e| CaptureError::MonitorGeometry(e.to_string()))?;
        let y = monitor
            .y()
            .map_err(|e| CaptureError::MonitorGeometry(e.to_string()))?;
        let shot = monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        min_x = min_x.min(x);
        min_y = min_y.min(y);
        // Captured pixel dimensions, not the monitor's logical size — these
        // differ on scaled displays.
        max_x = max_x.max(x + shot.width() as i32);
        max_y = max_y.max(y + shot.height() as i32);
        shots.push((x, y, shot));
    }

    let mut canvas = RgbaImage::new((max_x - min_x) as u32, (max_y - min_y) as u32);
    for (x, y, shot) in shots {
        imageops::replace(&mut canvas, &shot, (x - min_x) as i64, (y - min_y) as i64);
    }

    Ok(DynamicImage::ImageRgba8(canvas))
}
