//! Folder-mode session state.
//!
//! One state-owning object shared between the control panel (which mutates it
//! through Tauri commands) and the capture listener (which reads it per
//! request). A single mutex guards the three fields; no operation holds the
//! lock across capture or file I/O.

use crate::sanitize::sanitize;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Date format for auto-mode subfolders.
pub const DATE_FOLDER_FORMAT: &str = "%d.%m.%Y";

/// Today's date in `DD.MM.YYYY` form.
pub fn today_folder() -> String {
    Local::now().format(DATE_FOLDER_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderMode {
    /// Subfolder tracks today's date, refreshed per capture.
    Auto,
    /// Subfolder is a user-chosen name, fixed until changed.
    Manual,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Auto mode is ON — switch to Manual to create a custom folder")]
    AutoModeActive,

    #[error("Please enter a folder name")]
    EmptyFolderName,

    #[error("Failed to create folder: {0}")]
    CreateFolder(#[from] std::io::Error),
}

/// Shared mode/folder state. Starts in Auto mode with today's date.
#[derive(Debug)]
pub struct Session {
    mode: FolderMode,
    base_folder: PathBuf,
    active_subfolder: String,
}

pub type SharedSession = Arc<Mutex<Session>>;

impl Session {
    pub fn new(base_folder: PathBuf) -> Self {
        Self {
            mode: FolderMode::Auto,
            base_folder,
            active_subfolder: today_folder(),
        }
    }

    pub fn mode(&self) -> FolderMode {
        self.mode
    }

    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    pub fn active_subfolder(&self) -> &str {
        &self.active_subfolder
    }

    pub fn set_base_folder(&mut self, folder: PathBuf) {
        self.base_folder = folder;
    }

    /// Switches mode. Entering Auto recomputes the subfolder to today's date;
    /// entering Manual keeps the previous subfolder until the user creates one
    /// (the panel clears only its entry field).
    pub fn set_mode(&mut self, mode: FolderMode) {
        self.mode = mode;
        if self.mode == FolderMode::Auto {
            self.active_subfolder = today_folder();
        }
    }

    /// Creates a manual destination folder under the base folder and makes it
    /// the active subfolder. Only valid in Manual mode with a non-empty name;
    /// on any error the active subfolder is left unchanged and no directory
    /// is created.
    pub fn create_manual_folder(&mut self, name: &str) -> Result<String, SessionError> {
        if self.mode == FolderMode::Auto {
            return Err(SessionError::AutoModeActive);
        }

        let cleaned = sanitize(name.trim());
        if cleaned.is_empty() {
            return Err(SessionError::EmptyFolderName);
        }

        fs::create_dir_all(self.base_folder.join(&cleaned))?;
        self.active_subfolder = cleaned.clone();
        Ok(cleaned)
    }

    /// Target directory for the next capture. In Auto mode the subfolder is
    /// refreshed first so a day rollover mid-session lands in the new date.
    pub fn resolve_capture_dir(&mut self) -> PathBuf {
        if self.mode == FolderMode::Auto {
            self.active_subfolder = today_folder();
        }
        self.base_folder.join(&self.active_subfolder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn starts_in_auto_mode_on_todays_date() {
        let session = Session::new(PathBuf::from("/tmp"));
        assert_eq!(session.mode(), FolderMode::Auto);
        assert_eq!(session.active_subfolder(), today_folder());
    }

    #[test]
    fn manual_to_auto_resets_to_todays_date() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.set_mode(FolderMode::Manual);
        session.create_manual_folder("vacation").unwrap();
        assert_eq!(session.active_subfolder(), "vacation");

        session.set_mode(FolderMode::Auto);
        assert_eq!(session.active_subfolder(), today_folder());
    }

    #[test]
    fn entering_manual_keeps_previous_subfolder() {
        let mut session = Session::new(PathBuf::from("/tmp"));
        let before = session.active_subfolder().to_string();
        session.set_mode(FolderMode::Manual);
        assert_eq!(session.active_subfolder(), before);
    }

    #[test]
    fn create_manual_folder_sanitizes_and_creates() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.set_mode(FolderMode::Manual);

        let created = session.create_manual_folder("Holiday Trip 2025").unwrap();

        assert_eq!(created, "Holiday.Trip.2025");
        assert_eq!(session.active_subfolder(), "Holiday.Trip.2025");
        assert!(dir.path().join("Holiday.Trip.2025").is_dir());
    }

    #[test]
    fn create_manual_folder_rejected_in_auto_mode() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        let before = session.active_subfolder().to_string();

        let err = session.create_manual_folder("anything").unwrap_err();

        assert!(matches!(err, SessionError::AutoModeActive));
        assert_eq!(session.active_subfolder(), before);
        assert!(!dir.path().join("anything").exists());
    }

    #[test]
    fn empty_or_whitespace_name_is_a_user_error() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.set_mode(FolderMode::Manual);
        let before = session.active_subfolder().to_string();

        for name in ["", "   ", "///"] {
            let err = session.create_manual_folder(name).unwrap_err();
            assert!(matches!(err, SessionError::EmptyFolderName));
            assert_eq!(session.active_subfolder(), before);
        }
        // Nothing was created under the base folder.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn auto_capture_dir_tracks_the_date() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        assert_eq!(
            session.resolve_capture_dir(),
            dir.path().join(today_folder())
        );
    }

    #[test]
    fn manual_capture_dir_is_fixed() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.set_mode(FolderMode::Manual);
        session.create_manual_folder("fixed").unwrap();

        assert_eq!(session.resolve_capture_dir(), dir.path().join("fixed"));
    }
}
