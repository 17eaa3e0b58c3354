use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::error::NotionError;
use crate::reconcile::{DataSourceDetail, DataSourceSummary, PropertySpec};

pub(crate) const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";
pub(crate) const NOTION_API_VERSION: &str = "2022-06-28";

fn http_client() -> Result<Client, NotionError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|error| NotionError::Network(error.to_string()))
}

fn read_body(response: reqwest::blocking::Response) -> Result<Value, NotionError> {
    let status = response.status();
    let body_text = response
        .text()
        .map_err(|error| NotionError::Network(error.to_string()))?;
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(NotionError::Unauthorized);
    }
    if !status.is_success() {
        return Err(NotionError::Api {
            status: status.as_u16(),
            body: body_text,
        });
    }
    serde_json::from_str::<Value>(&body_text).map_err(|error| NotionError::Network(error.to_string()))
}

fn title_from_result(result: &Value) -> String {
    result
        .get("title")
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("plain_text"))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("Untitled")
        .to_string()
}

// An empty or missing token is Unauthorized without touching the network.
pub fn list_data_sources(token: &str) -> Result<Vec<DataSourceSummary>, NotionError> {
    if token.trim().is_empty() {
        return Err(NotionError::Unauthorized);
    }
    let client = http_client()?;
    let response = client
        .post(format!("{NOTION_API_BASE_URL}/search"))
        .header("Authorization", format!("Bearer {token}"))
        .header("Notion-Version", NOTION_API_VERSION)
        .header("Content-Type", "application/json")
        .json(&json!({
            "filter": { "value": "database", "property": "object" }
        }))
        .send()
        .map_err(|error| NotionError::Network(error.to_string()))?;

    let value = read_body(response)?;
    let results = value
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(results
        .iter()
        .filter_map(|result| {
            let id = result.get("id").and_then(Value::as_str)?;
            Some(DataSourceSummary {
                id: id.to_string(),
                name: title_from_result(result),
            })
        })
        .collect())
}

pub fn data_source_detail(token: &str, id: &str) -> Result<DataSourceDetail, NotionError> {
    if token.trim().is_empty() {
        return Err(NotionError::Unauthorized);
    }
    let client = http_client()?;
    let response = client
        .get(format!("{NOTION_API_BASE_URL}/databases/{id}"))
        .header("Authorization", format!("Bearer {token}"))
        .header("Notion-Version", NOTION_API_VERSION)
        .send()
        .map_err(|error| NotionError::Network(error.to_string()))?;

    let value = read_body(response)?;
    Ok(parse_detail(id, &value))
}

fn parse_detail(id: &str, value: &Value) -> DataSourceDetail {
    let mut properties = std::collections::HashMap::new();
    if let Some(schema) = value.get("properties").and_then(Value::as_object) {
        for (name, prop) in schema {
            let Some(prop_id) = prop.get("id").and_then(Value::as_str) else {
                continue;
            };
            let kind = prop
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            properties.insert(
                prop_id.to_string(),
                PropertySpec {
                    name: name.clone(),
                    kind,
                },
            );
        }
    }
    DataSourceDetail {
        id: id.to_string(),
        properties,
    }
}

pub fn create_task_page(
    token: &str,
    data_source_id: &str,
    date_property_name: &str,
    title: &str,
    date: Option<&str>,
) -> Result<(), NotionError> {
    if token.trim().is_empty() {
        return Err(NotionError::Unauthorized);
    }
    let properties = page_properties(date_property_name, title, date);
    let client = http_client()?;
    let response = client
        .post(format!("{NOTION_API_BASE_URL}/pages"))
        .header("Authorization", format!("Bearer {token}"))
        .header("Notion-Version", NOTION_API_VERSION)
        .header("Content-Type", "application/json")
        .json(&json!({
            "parent": { "database_id": data_source_id },
            "properties": properties,
        }))
        .send()
        .map_err(|error| NotionError::Network(error.to_string()))?;

    read_body(response).map(|_| ())
}

fn page_properties(date_property_name: &str, title: &str, date: Option<&str>) -> Value {
    let mut properties = json!({
        "Name": {
            "title": [{ "text": { "content": title } }]
        }
    });
    if let (Some(date), false) = (date, date_property_name.trim().is_empty()) {
        if let Some(map) = properties.as_object_mut() {
            map.insert(
                date_property_name.to_string(),
                json!({ "date": { "start": date } }),
            );
        }
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_unauthorized_before_any_request() {
        assert!(matches!(
            list_data_sources(""),
            Err(NotionError::Unauthorized)
        ));
        assert!(matches!(
            data_source_detail("  ", "ds-1"),
            Err(NotionError::Unauthorized)
        ));
        assert!(matches!(
            create_task_page("", "ds-1", "Due", "buy milk", None),
            Err(NotionError::Unauthorized)
        ));
    }

    #[test]
    fn detail_parsing_keys_properties_by_id() {
        let value = json!({
            "properties": {
                "Due Date": { "id": "p2", "type": "date", "date": {} },
                "Name": { "id": "title", "type": "title", "title": {} }
            }
        });
        let detail = parse_detail("ds-1", &value);
        assert_eq!(detail.id, "ds-1");
        assert_eq!(detail.properties.len(), 2);
        let due = &detail.properties["p2"];
        assert_eq!(due.name, "Due Date");
        assert_eq!(due.kind, "date");
    }

    #[test]
    fn untitled_results_get_a_fallback_name() {
        let result = json!({ "id": "ds-1", "title": [] });
        assert_eq!(title_from_result(&result), "Untitled");
        let result = json!({ "id": "ds-1", "title": [{ "plain_text": "Tasks" }] });
        assert_eq!(title_from_result(&result), "Tasks");
    }

    #[test]
    fn page_properties_include_date_only_when_parsed_and_configured() {
        let with_date = page_properties("Due Date", "buy milk", Some("2026-08-31"));
        assert_eq!(
            with_date["Due Date"]["date"]["start"],
            json!("2026-08-31")
        );

        let no_date = page_properties("Due Date", "buy milk", None);
        assert!(no_date.get("Due Date").is_none());

        let no_property = page_properties("", "buy milk", Some("2026-08-31"));
        assert_eq!(no_property.as_object().unwrap().len(), 1);
        assert_eq!(
            no_property["Name"]["title"][0]["text"]["content"],
            json!("buy milk")
        );
    }
}
