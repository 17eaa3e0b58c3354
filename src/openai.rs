use chrono::Local;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::task::TaskInformation;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

fn build_prompt(input: &str) -> String {
    let today = Local::now().format("%Y-%m-%d");
    format!(
        "Today is {today}. Extract a task from the text below. Respond with \
         JSON only, shaped as {{\"title\": string, \"date\": string or null}}. \
         The title is the task without any date phrasing; the date, when one \
         is stated or implied, is ISO 8601 (YYYY-MM-DD).\n\nText: {input}"
    )
}

pub(crate) fn extract_task(content: &str) -> Result<TaskInformation, String> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let task: TaskInformation =
        serde_json::from_str(body).map_err(|error| format!("unparseable task JSON: {error}"))?;
    if task.title.trim().is_empty() {
        return Err("parsed task has an empty title".to_string());
    }
    Ok(TaskInformation {
        title: task.title.trim().to_string(),
        date: task.date.filter(|d| !d.trim().is_empty()),
    })
}

pub fn parse_task(api_key: &str, input: &str) -> Result<TaskInformation, String> {
    let payload = json!({
        "model": OPENAI_MODEL,
        "messages": [{ "role": "user", "content": build_prompt(input) }],
        "temperature": 0,
    });

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|error| error.to_string())?;

    let response = client
        .post(OPENAI_CHAT_URL)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .map_err(|error| error.to_string())?;

    let status = response.status();
    let body = response.text().map_err(|error| error.to_string())?;
    if !status.is_success() {
        return Err(format!("OpenAI API {}: {body}", status.as_u16()));
    }

    let value: Value = serde_json::from_str(&body).map_err(|error| error.to_string())?;
    let content = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| "OpenAI response is empty".to_string())?;

    extract_task(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_json_content() {
        let task = extract_task(r#"{"title": "buy milk", "date": "2026-09-01"}"#).unwrap();
        assert_eq!(task.title, "buy milk");
        assert_eq!(task.date.as_deref(), Some("2026-09-01"));
    }

    #[test]
    fn tolerates_code_fences_and_null_dates() {
        let task =
            extract_task("```json\n{\"title\": \"call mom\", \"date\": null}\n```").unwrap();
        assert_eq!(task.title, "call mom");
        assert_eq!(task.date, None);
    }

    #[test]
    fn empty_titles_and_garbage_are_errors() {
        assert!(extract_task(r#"{"title": "  ", "date": null}"#).is_err());
        assert!(extract_task("sure, here is the task you asked for").is_err());
    }

    #[test]
    fn blank_dates_normalize_to_none() {
        let task = extract_task(r#"{"title": "buy milk", "date": ""}"#).unwrap();
        assert_eq!(task.date, None);
    }

    #[test]
    fn prompt_carries_the_current_date_and_input() {
        let prompt = build_prompt("ship report friday");
        assert!(prompt.contains("ship report friday"));
        assert!(prompt.contains(&Local::now().format("%Y-%m-%d").to_string()));
    }
}
