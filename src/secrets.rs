use keyring::{Entry, Error as KeyringError};

const KEYCHAIN_SERVICE: &str = "com.tasklight.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Notion,
    OpenAi,
}

impl SecretKind {
    pub fn account(self) -> &'static str {
        match self {
            SecretKind::Notion => "NotionAccessToken",
            SecretKind::OpenAi => "OpenAIAPISecret",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "notion" => Some(SecretKind::Notion),
            "openai" => Some(SecretKind::OpenAi),
            _ => None,
        }
    }
}

pub trait SecretVault: Send + Sync {
    fn store(&self, kind: SecretKind, value: &str) -> Result<(), String>;
    fn clear(&self, kind: SecretKind) -> Result<(), String>;
    fn has(&self, kind: SecretKind) -> Result<bool, String>;
    fn read(&self, kind: SecretKind) -> Result<Option<String>, String>;
}

pub struct KeyringVault;

fn keyring_entry(kind: SecretKind) -> Result<Entry, String> {
    Entry::new(KEYCHAIN_SERVICE, kind.account()).map_err(|error| error.to_string())
}

impl SecretVault for KeyringVault {
    fn store(&self, kind: SecretKind, value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("secret cannot be empty".to_string());
        }
        keyring_entry(kind)?
            .set_password(trimmed)
            .map_err(|error| error.to_string())
    }

    fn clear(&self, kind: SecretKind) -> Result<(), String> {
        match keyring_entry(kind)?.delete_password() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(error) => Err(error.to_string()),
        }
    }

    fn has(&self, kind: SecretKind) -> Result<bool, String> {
        match keyring_entry(kind)?.get_password() {
            Ok(value) => Ok(!value.trim().is_empty()),
            Err(KeyringError::NoEntry) => Ok(false),
            Err(error) => Err(error.to_string()),
        }
    }

    fn read(&self, kind: SecretKind) -> Result<Option<String>, String> {
        match keyring_entry(kind)?.get_password() {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value)),
            Ok(_) | Err(KeyringError::NoEntry) => Ok(None),
            Err(error) => Err(error.to_string()),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Records every write so tests can assert on the secret-before-settings
    // ordering of the save pipeline.
    #[derive(Default)]
    pub struct MemoryVault {
        pub entries: Mutex<HashMap<&'static str, String>>,
        pub fail_store: bool,
        pub store_calls: Mutex<Vec<&'static str>>,
    }

    impl MemoryVault {
        pub fn seed(&self, kind: SecretKind, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(kind.account(), value.to_string());
        }
    }

    impl SecretVault for MemoryVault {
        fn store(&self, kind: SecretKind, value: &str) -> Result<(), String> {
            self.store_calls.lock().unwrap().push(kind.account());
            if self.fail_store {
                return Err("keychain unavailable".to_string());
            }
            self.entries
                .lock()
                .unwrap()
                .insert(kind.account(), value.to_string());
            Ok(())
        }

        fn clear(&self, kind: SecretKind) -> Result<(), String> {
            self.entries.lock().unwrap().remove(kind.account());
            Ok(())
        }

        fn has(&self, kind: SecretKind) -> Result<bool, String> {
            Ok(self.entries.lock().unwrap().contains_key(kind.account()))
        }

        fn read(&self, kind: SecretKind) -> Result<Option<String>, String> {
            Ok(self.entries.lock().unwrap().get(kind.account()).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_kind_parses_known_labels() {
        assert_eq!(SecretKind::parse("openai"), Some(SecretKind::OpenAi));
        assert_eq!(SecretKind::parse(" Notion "), Some(SecretKind::Notion));
        assert_eq!(SecretKind::parse("gemini"), None);
    }
}
