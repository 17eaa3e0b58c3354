use tauri::{AppHandle, Emitter, State};

use crate::error::SaveError;
use crate::secrets::{SecretKind, SecretVault};
use crate::settings::AppSettings;
use crate::startup;
use crate::state::AppState;
use crate::status::{TauriStatusSink, Tone};

pub const SETTINGS_UPDATED_EVENT: &str = "settings-updated";

#[tauri::command]
pub fn get_settings(state: State<AppState>) -> Result<AppSettings, String> {
    let has_notion = state.vault.has(SecretKind::Notion).unwrap_or(false);
    let has_openai = state.vault.has(SecretKind::OpenAi).unwrap_or(false);

    let mut store = state.store.lock().map_err(|e| e.to_string())?;
    store.apply(|s| {
        s.has_notion_secret = has_notion;
        s.has_openai_key = has_openai;
    });
    Ok(store.settings().clone())
}

#[tauri::command]
pub fn update_settings(
    app: AppHandle,
    state: State<AppState>,
    settings: AppSettings,
    pending_openai_key: Option<String>,
) -> Result<AppSettings, String> {
    let sink = TauriStatusSink::new(app.clone());
    let pending = pending_openai_key.unwrap_or_default();
    let launch_on_startup = settings.launch_on_startup;

    if !state.save_gate.try_begin() {
        let error = SaveError::InProgress;
        if let Ok(mut status) = state.status.lock() {
            status.post(&sink, error.to_string(), Tone::Warning);
        }
        return Err(error.to_string());
    }
    let outcome = state
        .store
        .lock()
        .map_err(|e| e.to_string())
        .map(|mut store| store.save(settings, &pending, &state.vault, &state.settings_file));
    state.save_gate.finish();
    let outcome = outcome?;

    if let Err(error) = outcome {
        let tone = match &error {
            SaveError::Validation(_) | SaveError::InProgress => Tone::Warning,
            SaveError::SecretStore(_) | SaveError::Persist(_) => Tone::Negative,
        };
        if let Ok(mut status) = state.status.lock() {
            status.post(&sink, error.to_string(), tone);
        }
        return Err(error.to_string());
    }

    if let Err(error) = startup::set_launch_on_startup(launch_on_startup) {
        log::warn!("could not update launch-at-login registration: {error}");
    }
    if let Err(error) = super::hotkey::register_saved_hotkey(&app) {
        log::warn!("could not re-register global hotkey after save: {error}");
    }

    let saved = {
        let store = state.store.lock().map_err(|e| e.to_string())?;
        store.settings().clone()
    };
    if let Err(e) = app.emit(SETTINGS_UPDATED_EVENT, &saved) {
        log::warn!("failed to emit settings update: {e}");
    }
    if let Ok(mut status) = state.status.lock() {
        status.post(&sink, "Settings saved.", Tone::Positive);
    }
    Ok(saved)
}
