//! SnapStash — Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - Folder settings store (settings.rs) and shared session state (session.rs)
//! - Capture listener on 127.0.0.1:5000 (server.rs + capture/)
//! - Tauri command handlers for the control-panel window

pub mod capture;
pub mod sanitize;
pub mod server;
pub mod session;
pub mod settings;

use session::{FolderMode, Session, SharedSession};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tauri_plugin_dialog::DialogExt;

/// Snapshot of the session shown in the control panel's status line.
#[derive(Debug, serde::Serialize)]
pub struct FolderStatus {
    base_folder: String,
    active_subfolder: String,
    auto_mode: bool,
}

impl From<&Session> for FolderStatus {
    fn from(session: &Session) -> Self {
        Self {
            base_folder: session.base_folder().display().to_string(),
            active_subfolder: session.active_subfolder().to_string(),
            auto_mode: session.mode() == FolderMode::Auto,
        }
    }
}

/// Non-fatal settings-load warning held until the panel fetches it once.
struct StartupWarning(Mutex<Option<String>>);

/// Tauri command: current base folder, subfolder, and mode for the status line.
#[tauri::command]
fn folder_status(state: tauri::State<'_, SharedSession>) -> Result<FolderStatus, String> {
    let session = state.lock().map_err(|e| e.to_string())?;
    Ok(FolderStatus::from(&*session))
}

/// Tauri command: switch between Auto (date-named) and Manual folders.
#[tauri::command]
fn set_folder_mode(
    state: tauri::State<'_, SharedSession>,
    auto: bool,
) -> Result<FolderStatus, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    let mode = if auto {
        FolderMode::Auto
    } else {
        FolderMode::Manual
    };
    session.set_mode(mode);
    log::info!("Folder mode set to {mode:?}");
    Ok(FolderStatus::from(&*session))
}

/// Tauri command: create a user-named destination folder (Manual mode only).
/// The error string doubles as the dialog text shown by the panel.
#[tauri::command]
fn create_manual_folder(
    state: tauri::State<'_, SharedSession>,
    name: String,
) -> Result<FolderStatus, String> {
    let mut session = state.lock().map_err(|e| e.to_string())?;
    let created = session
        .create_manual_folder(&name)
        .map_err(|e| e.to_string())?;
    log::info!("Manual folder {created:?} is now active");
    Ok(FolderStatus::from(&*session))
}

/// Tauri command: native directory picker for the base folder. Returns `None`
/// when the user cancels; on selection the choice is persisted immediately.
#[tauri::command]
fn select_base_folder(
    app: tauri::AppHandle,
    state: tauri::State<'_, SharedSession>,
) -> Result<Option<FolderStatus>, String> {
    let current = {
        let session = state.lock().map_err(|e| e.to_string())?;
        session.base_folder().to_path_buf()
    };

    // Blocking is fine here — commands run off the main thread.
    let Some(picked) = app
        .dialog()
        .file()
        .set_directory(&current)
        .blocking_pick_folder()
    else {
        return Ok(None);
    };
    let folder = picked.into_path().map_err(|e| e.to_string())?;

    settings::save(Path::new(settings::CONFIG_FILE), &folder).map_err(|e| e.to_string())?;
    log::info!("Base folder set to {}", folder.display());

    let mut session = state.lock().map_err(|e| e.to_string())?;
    session.set_base_folder(folder);
    Ok(Some(FolderStatus::from(&*session)))
}

/// Tauri command: one-shot fetch of the settings-load warning, if any.
#[tauri::command]
fn take_startup_warning(warning: tauri::State<'_, StartupWarning>) -> Option<String> {
    warning.0.lock().ok().and_then(|mut slot| slot.take())
}

/// Entry point — called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    let (base_folder, warning) = settings::load(Path::new(settings::CONFIG_FILE));
    if let Some(w) = &warning {
        log::warn!("{w}");
    }
    log::info!("Base folder: {}", base_folder.display());

    let session: SharedSession = Arc::new(Mutex::new(Session::new(base_folder)));
    let listener_state = server::AppState {
        session: session.clone(),
        grabber: Arc::new(capture::XcapGrabber),
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(session)
        .manage(StartupWarning(Mutex::new(warning.map(|w| w.to_string()))))
        .invoke_handler(tauri::generate_handler![
            folder_status,
            set_folder_mode,
            create_manual_folder,
            select_base_folder,
            take_startup_warning
        ])
        .setup(move |_app| {
            log::info!("SnapStash starting up");

            tauri::async_runtime::spawn(async move {
                if let Err(e) = server::run(listener_state, server::listen_addr()).await {
                    log::error!("Capture listener exited: {e}");
                }
            });

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("Error running SnapStash");
}
