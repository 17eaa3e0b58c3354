use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceDetail {
    pub id: String,
    pub properties: HashMap<String, PropertySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub date_property_id: String,
    pub date_property_name: String,
    pub date_valid: bool,
    pub requires_data_source: bool,
    pub needs_choice: bool,
}

impl Reconciliation {
    fn cleared() -> Self {
        Self {
            date_property_id: String::new(),
            date_property_name: String::new(),
            date_valid: false,
            requires_data_source: false,
            needs_choice: false,
        }
    }
}

// Candidates are ordered by property id so reruns give the same answer. A
// detail of None means the schema fetch failed; the source is schema-less.
pub fn reconcile(
    selected_id: &str,
    detail: Option<&DataSourceDetail>,
    current_property_id: &str,
) -> Reconciliation {
    if selected_id.trim().is_empty() {
        return Reconciliation {
            requires_data_source: true,
            ..Reconciliation::cleared()
        };
    }

    let mut date_props: Vec<(&String, &PropertySpec)> = detail
        .map(|d| {
            d.properties
                .iter()
                .filter(|(_, spec)| spec.kind == "date")
                .collect()
        })
        .unwrap_or_default();
    date_props.sort_by(|a, b| a.0.cmp(b.0));

    match date_props.as_slice() {
        [] => Reconciliation::cleared(),
        // Last schema wins, even over a previously stored different choice.
        [(id, spec)] => Reconciliation {
            date_property_id: (*id).clone(),
            date_property_name: spec.name.clone(),
            date_valid: true,
            requires_data_source: false,
            needs_choice: false,
        },
        many => {
            let kept = many.iter().find(|(id, _)| id.as_str() == current_property_id);
            match kept {
                Some((id, spec)) => Reconciliation {
                    date_property_id: (*id).clone(),
                    date_property_name: spec.name.clone(),
                    date_valid: true,
                    requires_data_source: false,
                    needs_choice: true,
                },
                None => Reconciliation {
                    needs_choice: true,
                    ..Reconciliation::cleared()
                },
            }
        }
    }
}

pub fn auto_select_single(sources: &[DataSourceSummary], current_id: &str) -> Option<String> {
    if current_id.trim().is_empty() {
        if let [only] = sources {
            return Some(only.id.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_with(props: &[(&str, &str, &str)]) -> DataSourceDetail {
        DataSourceDetail {
            id: "ds-1".to_string(),
            properties: props
                .iter()
                .map(|(id, name, kind)| {
                    (
                        id.to_string(),
                        PropertySpec {
                            name: name.to_string(),
                            kind: kind.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn no_selection_requires_data_source_and_clears_dates() {
        let out = reconcile("", None, "p-old");
        assert!(out.requires_data_source);
        assert!(!out.date_valid);
        assert!(out.date_property_id.is_empty());
        assert!(out.date_property_name.is_empty());
    }

    #[test]
    fn zero_date_properties_clears_and_invalidates() {
        let detail = detail_with(&[("p1", "Name", "title"), ("p2", "Tags", "multi_select")]);
        let out = reconcile("ds-1", Some(&detail), "p-old");
        assert!(!out.date_valid);
        assert!(out.date_property_id.is_empty());
        assert!(!out.requires_data_source);
    }

    #[test]
    fn single_date_property_auto_assigns_over_stale_selection() {
        let detail = detail_with(&[("p1", "Due", "date"), ("p2", "Name", "title")]);
        let out = reconcile("ds-1", Some(&detail), "p-stale");
        assert_eq!(out.date_property_id, "p1");
        assert_eq!(out.date_property_name, "Due");
        assert!(out.date_valid);
        assert!(!out.needs_choice);
    }

    #[test]
    fn multiple_date_properties_keep_current_when_still_present() {
        let detail = detail_with(&[("p1", "Due", "date"), ("p2", "Started", "date")]);
        let out = reconcile("ds-1", Some(&detail), "p2");
        assert_eq!(out.date_property_id, "p2");
        assert_eq!(out.date_property_name, "Started");
        assert!(out.date_valid);
        assert!(out.needs_choice);
    }

    #[test]
    fn multiple_date_properties_clear_a_stale_selection() {
        let detail = detail_with(&[("p1", "Due", "date"), ("p2", "Started", "date")]);
        let out = reconcile("ds-1", Some(&detail), "p-gone");
        assert!(out.date_property_id.is_empty());
        assert!(!out.date_valid);
        assert!(out.needs_choice);
    }

    #[test]
    fn missing_schema_degrades_to_schema_less() {
        let out = reconcile("ds-1", None, "p1");
        assert!(!out.date_valid);
        assert!(!out.requires_data_source);
    }

    #[test]
    fn reconcile_is_idempotent_for_identical_inputs() {
        let detail = detail_with(&[("p1", "Due", "date"), ("p2", "Started", "date")]);
        let first = reconcile("ds-1", Some(&detail), "p1");
        let second = reconcile("ds-1", Some(&detail), "p1");
        assert_eq!(first, second);
    }

    #[test]
    fn auto_select_applies_only_to_a_single_unselected_source() {
        let one = vec![DataSourceSummary {
            id: "ds-1".to_string(),
            name: "Tasks".to_string(),
        }];
        assert_eq!(auto_select_single(&one, ""), Some("ds-1".to_string()));
        assert_eq!(auto_select_single(&one, "ds-2"), None);

        let two = vec![
            DataSourceSummary {
                id: "ds-1".to_string(),
                name: "Tasks".to_string(),
            },
            DataSourceSummary {
                id: "ds-2".to_string(),
                name: "Projects".to_string(),
            },
        ];
        assert_eq!(auto_select_single(&two, ""), None);
        assert_eq!(auto_select_single(&[], ""), None);
    }
}
