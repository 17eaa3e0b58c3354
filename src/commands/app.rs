use serde::Serialize;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_opener::OpenerExt;

use crate::help::{MenuEffect, MenuItem};
use crate::state::AppState;
use crate::status::{TauriStatusSink, Tone};

use super::settings::SETTINGS_UPDATED_EVENT;

#[tauri::command]
pub fn get_app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}

#[tauri::command]
pub fn show_settings_window(app: AppHandle) {
    crate::tray::show_settings_window(&app);
}

// Only http(s) and mailto links may leave the app.
#[tauri::command]
pub fn open_external_url(app: AppHandle, url: String) -> Result<(), String> {
    if !(url.starts_with("https://") || url.starts_with("http://") || url.starts_with("mailto:")) {
        return Err(format!("refusing to open url: {url}"));
    }
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn open_help_menu(state: State<AppState>) -> Result<(), String> {
    state.help.lock().map_err(|e| e.to_string())?.open();
    Ok(())
}

#[tauri::command]
pub fn close_help_menu(state: State<AppState>) -> Result<(), String> {
    state.help.lock().map_err(|e| e.to_string())?.close();
    Ok(())
}

#[tauri::command]
pub fn help_back(state: State<AppState>) -> Result<(), String> {
    state.help.lock().map_err(|e| e.to_string())?.back();
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpSelection {
    pub view: Option<&'static str>,
}

fn parse_menu_item(raw: &str) -> Result<MenuItem, String> {
    match raw {
        "about" => Ok(MenuItem::About),
        "acknowledgements" => Ok(MenuItem::Acknowledgements),
        "reset-cache" => Ok(MenuItem::ResetCache),
        "report-bug" => Ok(MenuItem::ReportBug),
        "contact-support" => Ok(MenuItem::ContactSupport),
        other => Err(format!("unknown help menu item: {other}")),
    }
}

#[tauri::command]
pub fn select_help_item(
    app: AppHandle,
    state: State<AppState>,
    item: String,
) -> Result<HelpSelection, String> {
    let item = parse_menu_item(&item)?;
    let effect = state.help.lock().map_err(|e| e.to_string())?.select(item);
    match effect {
        MenuEffect::Navigate => Ok(HelpSelection {
            view: Some(match item {
                MenuItem::About => "about",
                MenuItem::Acknowledgements => "acknowledgements",
                MenuItem::ResetCache => "reset-confirm",
                _ => "root",
            }),
        }),
        MenuEffect::OpenUrl(url) | MenuEffect::ComposeMail(url) => {
            app.opener()
                .open_url(url, None::<&str>)
                .map_err(|e| e.to_string())?;
            Ok(HelpSelection { view: None })
        }
        MenuEffect::Ignored => Ok(HelpSelection { view: None }),
    }
}

#[tauri::command]
pub fn clear_local_cache(app: AppHandle, state: State<AppState>) -> Result<bool, String> {
    {
        let mut cache = state.workspace.lock().map_err(|e| e.to_string())?;
        cache.clear();
    }

    let reloaded = state.settings_file.load_with_flags(&state.vault);
    {
        let mut store = state.store.lock().map_err(|e| e.to_string())?;
        store.apply(|s| *s = reloaded.clone());
    }

    state
        .help
        .lock()
        .map_err(|e| e.to_string())?
        .reset_succeeded();

    if let Err(e) = app.emit(SETTINGS_UPDATED_EVENT, &reloaded) {
        log::warn!("failed to emit settings update: {e}");
    }
    let sink = TauriStatusSink::new(app.clone());
    if let Ok(mut status) = state.status.lock() {
        status.post(&sink, "Local cache cleared.", Tone::Positive);
    }
    Ok(true)
}
