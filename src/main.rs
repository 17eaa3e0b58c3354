#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tauri::{Emitter, Manager, WindowEvent};

mod commands;
mod error;
mod help;
mod hotkey;
mod notion;
mod oauth;
mod openai;
mod reconcile;
mod secrets;
mod settings;
mod startup;
mod state;
mod status;
mod storage;
mod task;
mod tray;
mod workspace;

use state::AppState;

pub const WINDOW_FOCUSED_EVENT: &str = "window-focused";

pub fn toggle_main_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window("main") else {
        log::warn!("launcher window not found");
        return;
    };
    if window.is_visible().unwrap_or(false) {
        if let Err(error) = window.hide() {
            log::warn!("could not hide launcher window: {error}");
        }
    } else {
        if let Err(error) = window.show() {
            log::warn!("could not show launcher window: {error}");
        }
        if let Err(error) = window.set_focus() {
            log::warn!("could not focus launcher window: {error}");
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_opener::init())
        .manage(AppState::load())
        .setup(|app| {
            tray::install(app.handle())?;
            if let Err(error) = commands::hotkey::register_saved_hotkey(app.handle()) {
                log::error!("could not register the global hotkey: {error}");
            }
            let launch_on_startup = {
                let state = app.state::<AppState>();
                let store = state.store.lock().map_err(|e| e.to_string())?;
                store.settings().launch_on_startup
            };
            if let Err(error) = startup::set_launch_on_startup(launch_on_startup) {
                log::warn!("could not sync launch-at-login registration: {error}");
            }
            Ok(())
        })
        .on_window_event(|window, event| {
            // Settings views re-read their state when they come back to front.
            if let WindowEvent::Focused(true) = event {
                if let Err(e) = window.emit(WINDOW_FOCUSED_EVENT, window.label()) {
                    log::warn!("failed to emit focus event: {e}");
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::settings::get_settings,
            commands::settings::update_settings,
            commands::secrets::save_secret,
            commands::secrets::clear_secret,
            commands::workspace::list_data_sources,
            commands::workspace::get_data_source_detail,
            commands::workspace::start_notion_oauth,
            commands::hotkey::pause_global_hotkey,
            commands::hotkey::resume_global_hotkey,
            commands::hotkey::begin_hotkey_capture,
            commands::hotkey::cancel_hotkey_capture,
            commands::hotkey::capture_key_event,
            commands::task::process_message,
            commands::app::get_app_version,
            commands::app::show_settings_window,
            commands::app::open_external_url,
            commands::app::open_help_menu,
            commands::app::close_help_menu,
            commands::app::help_back,
            commands::app::select_help_item,
            commands::app::clear_local_cache,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
