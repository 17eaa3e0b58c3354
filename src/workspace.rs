use std::collections::HashMap;

use crate::error::NotionError;
use crate::reconcile::{DataSourceDetail, DataSourceSummary};
use crate::status::{StatusChannel, StatusSink, Tone};

#[derive(Default)]
pub struct WorkspaceCache {
    pub sources: Option<Vec<DataSourceSummary>>,
    pub details: HashMap<String, DataSourceDetail>,
}

impl WorkspaceCache {
    pub fn clear(&mut self) {
        self.sources = None;
        self.details.clear();
    }
}

// Unauthorized means no workspace is connected yet and stays silent; any
// other failure degrades to an empty list with a visible warning.
pub fn absorb_list_result(
    result: Result<Vec<DataSourceSummary>, NotionError>,
    status: &mut StatusChannel,
    sink: &dyn StatusSink,
) -> Vec<DataSourceSummary> {
    match result {
        Ok(sources) => sources,
        Err(e) if e.is_unauthorized() => Vec::new(),
        Err(e) => {
            status.post(
                sink,
                format!("Could not load Notion data sources: {e}"),
                Tone::Warning,
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::testing::MemorySink;

    fn source(id: &str, name: &str) -> DataSourceSummary {
        DataSourceSummary {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn successful_refresh_passes_sources_through_silently() {
        let sink = MemorySink::default();
        let mut status = StatusChannel::new();

        let out = absorb_list_result(
            Ok(vec![source("ds-1", "Tasks")]),
            &mut status,
            &sink,
        );

        assert_eq!(out.len(), 1);
        assert!(status.last().is_none());
    }

    #[test]
    fn unauthorized_yields_empty_list_with_no_warning() {
        let sink = MemorySink::default();
        let mut status = StatusChannel::new();

        let out = absorb_list_result(Err(NotionError::Unauthorized), &mut status, &sink);

        assert!(out.is_empty());
        assert!(status.last().is_none());
        assert!(sink.published.lock().unwrap().is_empty());
    }

    #[test]
    fn other_failures_warn_and_degrade_to_empty() {
        let sink = MemorySink::default();
        let mut status = StatusChannel::new();

        let out = absorb_list_result(
            Err(NotionError::Network("connection refused".to_string())),
            &mut status,
            &sink,
        );

        assert!(out.is_empty());
        let last = status.last().unwrap();
        assert_eq!(last.tone, Tone::Warning);
        assert!(last.text.contains("connection refused"));
    }

    #[test]
    fn clear_drops_sources_and_details() {
        let mut cache = WorkspaceCache::default();
        cache.sources = Some(vec![source("ds-1", "Tasks")]);
        cache.details.insert(
            "ds-1".to_string(),
            DataSourceDetail {
                id: "ds-1".to_string(),
                properties: HashMap::new(),
            },
        );

        cache.clear();

        assert!(cache.sources.is_none());
        assert!(cache.details.is_empty());
    }
}
