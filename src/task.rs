use serde::{Deserialize, Serialize};

use crate::notion;
use crate::openai;
use crate::secrets::{SecretKind, SecretVault};
use crate::settings::AppSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInformation {
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl TaskInformation {
    pub fn passthrough(input: &str) -> Self {
        Self {
            title: input.trim().to_string(),
            date: None,
        }
    }
}

// On any parse failure the raw text becomes the title unchanged.
pub fn parse_entry(settings: &AppSettings, vault: &dyn SecretVault, input: &str) -> TaskInformation {
    if settings.use_open_ai {
        match vault.read(SecretKind::OpenAi) {
            Ok(Some(key)) if !key.trim().is_empty() => match openai::parse_task(&key, input) {
                Ok(task) => return task,
                Err(error) => {
                    log::warn!("AI task parsing failed, using raw entry: {error}");
                }
            },
            Ok(_) => log::warn!("AI parsing enabled but no OpenAI key stored"),
            Err(error) => log::warn!("could not read OpenAI key: {error}"),
        }
    }
    TaskInformation::passthrough(input)
}

pub fn process(
    settings: &AppSettings,
    vault: &dyn SecretVault,
    input: &str,
) -> Result<TaskInformation, String> {
    if input.trim().is_empty() {
        return Err("Task cannot be empty".to_string());
    }
    let token = vault
        .read(SecretKind::Notion)?
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| "No Notion workspace connected. Open Settings to connect.".to_string())?;
    if settings.notion_data_source_id.trim().is_empty() {
        return Err("No Notion data source selected. Open Settings to pick one.".to_string());
    }

    let task = parse_entry(settings, vault, input);
    notion::create_task_page(
        &token,
        &settings.notion_data_source_id,
        &settings.date_property_name,
        &task.title,
        task.date.as_deref(),
    )
    .map_err(|error| error.to_string())?;
    Ok(task)
}
