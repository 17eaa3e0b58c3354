use tauri::{AppHandle, Emitter, State};

use crate::secrets::{SecretKind, SecretVault};
use crate::state::AppState;

use super::settings::SETTINGS_UPDATED_EVENT;

fn parse_kind(kind: &str) -> Result<SecretKind, String> {
    SecretKind::parse(kind).ok_or_else(|| format!("unknown secret kind: {kind}"))
}

fn sync_presence_flag(state: &State<AppState>, kind: SecretKind, present: bool) {
    if let Ok(mut store) = state.store.lock() {
        store.apply(|s| match kind {
            SecretKind::Notion => s.has_notion_secret = present,
            SecretKind::OpenAi => s.has_openai_key = present,
        });
    }
}

#[tauri::command]
pub fn save_secret(
    app: AppHandle,
    state: State<AppState>,
    kind: String,
    value: String,
) -> Result<(), String> {
    let kind = parse_kind(&kind)?;
    state.vault.store(kind, &value)?;
    sync_presence_flag(&state, kind, true);
    if let Err(e) = app.emit(SETTINGS_UPDATED_EVENT, ()) {
        log::warn!("failed to emit settings update: {e}");
    }
    Ok(())
}

#[tauri::command]
pub fn clear_secret(
    app: AppHandle,
    state: State<AppState>,
    kind: String,
) -> Result<(), String> {
    let kind = parse_kind(&kind)?;
    state.vault.clear(kind)?;
    sync_presence_flag(&state, kind, false);
    if let Err(e) = app.emit(SETTINGS_UPDATED_EVENT, ()) {
        log::warn!("failed to emit settings update: {e}");
    }
    Ok(())
}
