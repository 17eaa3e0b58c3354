use std::sync::atomic::Ordering;

use serde::Serialize;
use tauri::{AppHandle, Emitter, State};

use crate::notion;
use crate::oauth;
use crate::reconcile::{self, DataSourceDetail, DataSourceSummary, Reconciliation};
use crate::secrets::{SecretKind, SecretVault};
use crate::state::AppState;
use crate::status::{TauriStatusSink, Tone};
use crate::workspace::absorb_list_result;

use super::settings::SETTINGS_UPDATED_EVENT;

#[tauri::command]
pub fn list_data_sources(
    app: AppHandle,
    state: State<AppState>,
) -> Result<Vec<DataSourceSummary>, String> {
    let sink = TauriStatusSink::new(app.clone());
    let token = state
        .vault
        .read(SecretKind::Notion)?
        .unwrap_or_default();

    let result = notion::list_data_sources(&token);
    let sources = {
        let mut status = state.status.lock().map_err(|e| e.to_string())?;
        absorb_list_result(result, &mut status, &sink)
    };

    {
        let mut cache = state.workspace.lock().map_err(|e| e.to_string())?;
        cache.sources = Some(sources.clone());
        cache.details.clear();
    }

    let current_id = {
        let store = state.store.lock().map_err(|e| e.to_string())?;
        store.settings().notion_data_source_id.clone()
    };
    if let Some(only_id) = reconcile::auto_select_single(&sources, &current_id) {
        let mut store = state.store.lock().map_err(|e| e.to_string())?;
        store.apply(|s| s.notion_data_source_id = only_id);
        if let Err(e) = app.emit(SETTINGS_UPDATED_EVENT, store.settings()) {
            log::warn!("failed to emit settings update: {e}");
        }
    }

    Ok(sources)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceResolution {
    pub detail: Option<DataSourceDetail>,
    pub reconciliation: Reconciliation,
}

#[tauri::command]
pub fn get_data_source_detail(
    app: AppHandle,
    state: State<AppState>,
    id: String,
) -> Result<DataSourceResolution, String> {
    let sink = TauriStatusSink::new(app.clone());

    let cached = {
        let cache = state.workspace.lock().map_err(|e| e.to_string())?;
        cache.details.get(&id).cloned()
    };

    let detail = match cached {
        Some(detail) => Some(detail),
        None => {
            let token = state
                .vault
                .read(SecretKind::Notion)?
                .unwrap_or_default();
            match notion::data_source_detail(&token, &id) {
                Ok(detail) => {
                    let mut cache = state.workspace.lock().map_err(|e| e.to_string())?;
                    cache.details.insert(id.clone(), detail.clone());
                    Some(detail)
                }
                Err(error) if error.is_unauthorized() => None,
                Err(error) => {
                    let mut status = state.status.lock().map_err(|e| e.to_string())?;
                    status.post(
                        &sink,
                        format!("Could not load the data source schema: {error}"),
                        Tone::Warning,
                    );
                    None
                }
            }
        }
    };

    let mut store = state.store.lock().map_err(|e| e.to_string())?;
    let current_property_id = store.settings().date_property_id.clone();
    let reconciliation = reconcile::reconcile(&id, detail.as_ref(), &current_property_id);
    store.apply(|s| {
        s.notion_data_source_id = id.clone();
        s.date_property_id = reconciliation.date_property_id.clone();
        s.date_property_name = reconciliation.date_property_name.clone();
    });

    Ok(DataSourceResolution {
        detail,
        reconciliation,
    })
}

#[tauri::command]
pub fn start_notion_oauth(app: AppHandle, state: State<AppState>) -> Result<(), String> {
    if state.connecting.swap(true, Ordering::SeqCst) {
        log::info!("oauth flow already running, ignoring duplicate start");
        return Ok(());
    }
    oauth::start(app);
    Ok(())
}
