use tauri::{AppHandle, Emitter, Manager, State};

use crate::state::AppState;
use crate::status::{TauriStatusSink, Tone};
use crate::task;

pub const BACKEND_ERROR_EVENT: &str = "backend-error";

// On failure the launcher stays up so the entry is not lost.
#[tauri::command]
pub fn process_message(
    app: AppHandle,
    state: State<AppState>,
    message: String,
) -> Result<(), String> {
    let settings = {
        let store = state.store.lock().map_err(|e| e.to_string())?;
        store.settings().clone()
    };

    match task::process(&settings, &state.vault, &message) {
        Ok(task) => {
            log::info!("created task: {}", task.title);
            if let Some(window) = app.get_webview_window("main") {
                if let Err(error) = window.hide() {
                    log::warn!("could not hide launcher window: {error}");
                }
            }
            Ok(())
        }
        Err(error) => {
            if let Err(e) = app.emit(BACKEND_ERROR_EVENT, &error) {
                log::warn!("failed to emit backend error: {e}");
            }
            let sink = TauriStatusSink::new(app.clone());
            if let Ok(mut status) = state.status.lock() {
                status.post(&sink, error.clone(), Tone::Negative);
            }
            Err(error)
        }
    }
}
