use crate::render::{OrphanMap, PageLinks};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Final response body of a collection listing.
///
/// `orphans` is absent when extraction was not requested and an explicit,
/// possibly empty, object when it was.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub total_results: u64,
    pub total_pages: u64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub resources: Vec<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphans: Option<OrphanMap>,
}

impl RenderedDocument {
    pub fn assemble(
        total_count: u64,
        results_per_page: u32,
        resources: Vec<JsonValue>,
        orphans: Option<OrphanMap>,
        links: PageLinks,
    ) -> Self {
        Self {
            total_results: total_count,
            total_pages: total_pages(total_count, results_per_page),
            prev_url: links.prev_url,
            next_url: links.next_url,
            resources,
            orphans,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

pub fn total_pages(total_count: u64, results_per_page: u32) -> u64 {
    if total_count == 0 || results_per_page == 0 {
        0
    } else {
        total_count.div_ceil(u64::from(results_per_page))
    }
}
