use tauri::menu::{MenuBuilder, MenuItemBuilder};
use tauri::tray::TrayIconBuilder;
use tauri::Manager;

// The settings window has no decorations-level entry point of its own; the
// tray menu is how users reach it.
pub fn install(app: &tauri::AppHandle) -> tauri::Result<()> {
    let show = MenuItemBuilder::with_id("show", "Show Tasklight").build(app)?;
    let settings = MenuItemBuilder::with_id("settings", "Settings…").build(app)?;
    let quit = MenuItemBuilder::with_id("quit", "Quit Tasklight").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&show)
        .item(&settings)
        .separator()
        .item(&quit)
        .build()?;

    let mut tray = TrayIconBuilder::new()
        .menu(&menu)
        .tooltip("Tasklight")
        .on_menu_event(|app, event| match event.id().as_ref() {
            "show" => crate::toggle_main_window(app),
            "settings" => show_settings_window(app),
            "quit" => app.exit(0),
            other => log::warn!("unknown tray menu item: {other}"),
        });
    if let Some(icon) = app.default_window_icon() {
        tray = tray.icon(icon.clone());
    }
    tray.build(app)?;
    Ok(())
}

pub fn show_settings_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window("settings") else {
        log::warn!("settings window not found");
        return;
    };
    if let Err(error) = window.show() {
        log::warn!("could not show settings window: {error}");
    }
    if let Err(error) = window.set_focus() {
        log::warn!("could not focus settings window: {error}");
    }
}
