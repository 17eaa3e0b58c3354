use std::fs;
use std::path::{Path, PathBuf};

use crate::secrets::{SecretKind, SecretVault};
use crate::settings::{AppSettings, SettingsPersist};

const SETTINGS_DIR_NAME: &str = "Tasklight";
const SETTINGS_FILE_NAME: &str = "settings.json";

pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Self {
        if let Ok(override_path) = std::env::var("TASKLIGHT_SETTINGS_PATH") {
            if !override_path.trim().is_empty() {
                return Self::at(PathBuf::from(override_path));
            }
        }
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    // A missing or corrupt file falls back to defaults; it must never keep
    // the app from starting.
    pub fn load(&self) -> AppSettings {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => AppSettings::default(),
        }
    }

    pub fn load_with_flags(&self, vault: &dyn SecretVault) -> AppSettings {
        let mut settings = self.load();
        if let Ok(present) = vault.has(SecretKind::Notion) {
            settings.has_notion_secret = present;
        }
        if let Ok(present) = vault.has(SecretKind::OpenAi) {
            settings.has_openai_key = present;
        }
        settings
    }
}

impl SettingsPersist for SettingsFile {
    fn persist(&self, settings: &AppSettings) -> Result<(), String> {
        let bytes = serde_json::to_vec_pretty(settings).map_err(|error| error.to_string())?;
        write_atomic(&self.path, &bytes).map_err(|error| error.to_string())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;
    use tempfile::tempdir;

    #[test]
    fn persist_then_load_round_trips_the_snapshot() {
        let dir = tempdir().expect("tempdir");
        let file = SettingsFile::at(dir.path().join("nested").join("settings.json"));

        let mut settings = AppSettings::default();
        settings.notion_data_source_id = "ds-9".to_string();
        settings.theme = Theme::Dark;
        settings.hotkey = "ctrl+cmd+space".to_string();

        file.persist(&settings).expect("persist");
        let loaded = file.load();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let file = SettingsFile::at(dir.path().join("settings.json"));
        assert_eq!(file.load(), AppSettings::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{not json").expect("write");
        let file = SettingsFile::at(path);
        assert_eq!(file.load(), AppSettings::default());
    }
}
