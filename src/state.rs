use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use tauri_plugin_global_shortcut::Shortcut;

use crate::help::HelpNavigator;
use crate::hotkey::HotkeyCapture;
use crate::secrets::KeyringVault;
use crate::settings::{SaveGate, SettingsStore};
use crate::status::StatusChannel;
use crate::storage::settings_io::SettingsFile;
use crate::workspace::WorkspaceCache;

pub struct AppState {
    pub store: Mutex<SettingsStore>,
    pub capture: Mutex<HotkeyCapture>,
    pub workspace: Mutex<WorkspaceCache>,
    pub status: Mutex<StatusChannel>,
    pub help: Mutex<HelpNavigator>,
    pub registered_shortcut: Mutex<Option<Shortcut>>,
    pub save_gate: SaveGate,
    pub connecting: AtomicBool,
    pub settings_file: SettingsFile,
    pub vault: KeyringVault,
}

impl AppState {
    pub fn load() -> Self {
        let settings_file = SettingsFile::default_location();
        let vault = KeyringVault;
        let settings = settings_file.load_with_flags(&vault);
        Self {
            store: Mutex::new(SettingsStore::new(settings)),
            capture: Mutex::new(HotkeyCapture::default()),
            workspace: Mutex::new(WorkspaceCache::default()),
            status: Mutex::new(StatusChannel::new()),
            help: Mutex::new(HelpNavigator::new()),
            registered_shortcut: Mutex::new(None),
            save_gate: SaveGate::new(),
            connecting: AtomicBool::new(false),
            settings_file,
            vault,
        }
    }
}
