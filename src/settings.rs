//! Persisted base-folder settings.
//!
//! A single JSON record in the process working directory remembers the last
//! base folder the user picked. Anything wrong with it — missing file, corrupt
//! JSON, folder deleted since last run — degrades to the per-user Downloads
//! directory with a warning; settings problems are never fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Serialize, Deserialize)]
struct SettingsRecord {
    folder_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write settings file: {0}")]
    Write(#[from] std::io::Error),
}

/// Non-fatal reason `load` fell back to the default directory.
/// Surfaced once in the control panel, logged, then forgotten.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadWarning {
    #[error("Settings file is unreadable — falling back to {}", .fallback.display())]
    Unreadable { fallback: PathBuf },

    #[error("Selected folder {} not found — falling back to {}", .stored.display(), .fallback.display())]
    StoredFolderMissing { stored: PathBuf, fallback: PathBuf },
}

/// Loads the persisted base folder, or the per-user default if the record is
/// absent, unreadable, or points at a folder that no longer exists.
pub fn load(config_path: &Path) -> (PathBuf, Option<LoadWarning>) {
    let fallback = default_base_folder();

    if !config_path.exists() {
        return (fallback, None);
    }

    let record = fs::read_to_string(config_path)
        .ok()
        .and_then(|text| serde_json::from_str::<SettingsRecord>(&text).ok());

    match record {
        Some(record) if record.folder_path.is_dir() => (record.folder_path, None),
        Some(record) => {
            let warning = LoadWarning::StoredFolderMissing {
                stored: record.folder_path,
                fallback: fallback.clone(),
            };
            (fallback, Some(warning))
        }
        None => {
            let warning = LoadWarning::Unreadable {
                fallback: fallback.clone(),
            };
            (fallback, Some(warning))
        }
    }
}

/// Overwrites the persisted record; subsequent `load` calls (including after
/// restart) return `folder` as long as it still exists on disk.
pub fn save(config_path: &Path, folder: &Path) -> Result<(), SettingsError> {
    let record = SettingsRecord {
        folder_path: folder.to_path_buf(),
    };
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(config_path, json)?;
    Ok(())
}

/// Per-user default: the Downloads directory, then home, then the working
/// directory as a last resort.
pub fn default_base_folder() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        let folder = dir.path().join("shots");
        fs::create_dir(&folder).unwrap();

        save(&config, &folder).unwrap();
        let (loaded, warning) = load(&config);

        assert_eq!(loaded, folder);
        assert!(warning.is_none());
    }

    #[test]
    fn absent_file_falls_back_silently() {
        let dir = tempdir().unwrap();
        let (loaded, warning) = load(&dir.path().join("nope.json"));

        assert_eq!(loaded, default_base_folder());
        assert!(warning.is_none());
    }

    #[test]
    fn missing_stored_folder_falls_back_with_warning() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        let gone = dir.path().join("deleted-later");
        fs::create_dir(&gone).unwrap();
        save(&config, &gone).unwrap();
        fs::remove_dir(&gone).unwrap();

        let (loaded, warning) = load(&config);

        assert_eq!(loaded, default_base_folder());
        assert!(matches!(
            warning,
            Some(LoadWarning::StoredFolderMissing { stored, .. }) if stored == gone
        ));
    }

    #[test]
    fn corrupt_record_falls_back_with_warning() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, "{ not json").unwrap();

        let (loaded, warning) = load(&config);

        assert_eq!(loaded, default_base_folder());
        assert!(matches!(warning, Some(LoadWarning::Unreadable { .. })));
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        let first = dir.path().join("a");
        let second = dir.path().join("b");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();

        save(&config, &first).unwrap();
        save(&config, &second).unwrap();

        let (loaded, _) = load(&config);
        assert_eq!(loaded, second);
    }
}
