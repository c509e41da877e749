//! Build script for the SnapStash Tauri app.
//!
//! Nothing platform-specific here — Tauri generates its glue code,
//! and `xcap` handles the per-OS capture backends on its own.

fn main() {
    tauri_build::build();
}
