use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{SaveError, ValidationError};
use crate::secrets::{SecretKind, SecretVault};

pub const DEFAULT_HOTKEY: &str = "option+space";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub notion_data_source_id: String,
    #[serde(default)]
    pub use_open_ai: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub launch_on_startup: bool,
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    // Presence flags only; secret material never lands in the settings file.
    #[serde(default)]
    pub has_notion_secret: bool,
    #[serde(default)]
    pub has_openai_key: bool,
    #[serde(default)]
    pub date_property_id: String,
    #[serde(default)]
    pub date_property_name: String,
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notion_data_source_id: String::new(),
            use_open_ai: false,
            theme: Theme::Light,
            launch_on_startup: false,
            hotkey: default_hotkey(),
            has_notion_secret: false,
            has_openai_key: false,
            date_property_id: String::new(),
            date_property_name: String::new(),
        }
    }
}

pub trait SettingsPersist {
    fn persist(&self, settings: &AppSettings) -> Result<(), String>;
}

pub struct SettingsStore {
    settings: AppSettings,
}

impl SettingsStore {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn apply(&mut self, mutate: impl FnOnce(&mut AppSettings)) {
        mutate(&mut self.settings);
    }

    // The pending key goes to the vault before the snapshot is persisted;
    // a vault failure must not leave settings referencing an unsaved key.
    pub fn save(
        &mut self,
        mut incoming: AppSettings,
        pending_openai_key: &str,
        vault: &dyn SecretVault,
        persist: &dyn SettingsPersist,
    ) -> Result<(), SaveError> {
        if incoming.notion_data_source_id.trim().is_empty() {
            return Err(ValidationError::NoDataSource.into());
        }
        if incoming.date_property_id.trim().is_empty() {
            return Err(ValidationError::NoDateProperty.into());
        }

        let pending = pending_openai_key.trim();
        if incoming.use_open_ai && !incoming.has_openai_key && pending.is_empty() {
            return Err(ValidationError::MissingKey.into());
        }

        if !pending.is_empty() {
            vault
                .store(SecretKind::OpenAi, pending)
                .map_err(SaveError::SecretStore)?;
            incoming.has_openai_key = true;
        }

        persist.persist(&incoming).map_err(SaveError::Persist)?;
        self.settings = incoming;
        Ok(())
    }
}

// Commands run concurrently on the runtime's thread pool; a second save
// attempt fails fast instead of queueing behind the first.
pub struct SaveGate(AtomicBool);

impl SaveGate {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn try_begin(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for SaveGate {
    fn default() -> Self {
        Self::new()
    }
}
