use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

use crate::hotkey::{parse_combo, to_shortcut, CaptureUpdate};
use crate::state::AppState;

pub const GLOBAL_HOTKEY_EVENT: &str = "global-hotkey";
pub const HOTKEY_CAPTURED_EVENT: &str = "hotkey-captured";

pub fn register_saved_hotkey(app: &AppHandle) -> Result<(), String> {
    let state = app.state::<AppState>();
    let saved = {
        let store = state.store.lock().map_err(|e| e.to_string())?;
        store.settings().hotkey.clone()
    };
    let shortcut = to_shortcut(&parse_combo(&saved)?)?;

    let previous = state
        .registered_shortcut
        .lock()
        .map_err(|e| e.to_string())?
        .take();
    if let Some(prev) = previous {
        if let Err(error) = app.global_shortcut().unregister(prev) {
            log::warn!("could not unregister previous hotkey: {error}");
        }
    }

    app.global_shortcut()
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                crate::toggle_main_window(app);
                if let Err(e) = app.emit(GLOBAL_HOTKEY_EVENT, ()) {
                    log::warn!("failed to emit hotkey event: {e}");
                }
            }
        })
        .map_err(|e| e.to_string())?;

    *state
        .registered_shortcut
        .lock()
        .map_err(|e| e.to_string())? = Some(shortcut);
    log::info!("registered global hotkey: {saved}");
    Ok(())
}

fn unregister_current(app: &AppHandle) -> Result<(), String> {
    let state = app.state::<AppState>();
    let current = state
        .registered_shortcut
        .lock()
        .map_err(|e| e.to_string())?
        .take();
    if let Some(shortcut) = current {
        app.global_shortcut()
            .unregister(shortcut)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[tauri::command]
pub fn pause_global_hotkey(app: AppHandle) -> Result<(), String> {
    unregister_current(&app)
}

#[tauri::command]
pub fn resume_global_hotkey(app: AppHandle) -> Result<(), String> {
    register_saved_hotkey(&app)
}

// The shortcut is suspended while recording so the keys being captured do
// not trigger the launcher.
#[tauri::command]
pub fn begin_hotkey_capture(app: AppHandle, state: State<'_, AppState>) -> Result<(), String> {
    unregister_current(&app)?;
    state
        .capture
        .lock()
        .map_err(|e| e.to_string())?
        .begin();
    Ok(())
}

#[tauri::command]
pub fn cancel_hotkey_capture(app: AppHandle, state: State<'_, AppState>) -> Result<(), String> {
    state
        .capture
        .lock()
        .map_err(|e| e.to_string())?
        .cancel();
    register_saved_hotkey(&app)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEventResult {
    pub recording: bool,
    pub cancelled: bool,
    pub hotkey: Option<String>,
}

#[tauri::command]
pub fn capture_key_event(
    app: AppHandle,
    state: State<'_, AppState>,
    key: String,
    pressed: bool,
) -> Result<CaptureEventResult, String> {
    let update = {
        let mut capture = state.capture.lock().map_err(|e| e.to_string())?;
        if pressed {
            capture.key_down(&key)
        } else {
            capture.key_up()
        }
    };

    match update {
        CaptureUpdate::Committed(combo) => {
            {
                let mut store = state.store.lock().map_err(|e| e.to_string())?;
                store.apply(|s| s.hotkey = combo.clone());
            }
            register_saved_hotkey(&app)?;
            if let Err(e) = app.emit(HOTKEY_CAPTURED_EVENT, &combo) {
                log::warn!("failed to emit captured hotkey: {e}");
            }
            Ok(CaptureEventResult {
                recording: false,
                cancelled: false,
                hotkey: Some(combo),
            })
        }
        CaptureUpdate::Cancelled => {
            register_saved_hotkey(&app)?;
            Ok(CaptureEventResult {
                recording: false,
                cancelled: true,
                hotkey: None,
            })
        }
        CaptureUpdate::Recorded | CaptureUpdate::Ignored => {
            let recording = {
                let capture = state.capture.lock().map_err(|e| e.to_string())?;
                capture.state() == crate::hotkey::CaptureState::Recording
            };
            Ok(CaptureEventResult {
                recording,
                cancelled: false,
                hotkey: None,
            })
        }
    }
}
