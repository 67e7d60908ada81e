//! Pagination envelope normalization
//!
//! Endpoints speak one of two envelope dialects. Both are decoded here,
//! and only here, into the canonical [`PageResult`]:
//!
//! - connection style (GraphQL-ish):
//!   `{"data": {<collection>: {"edges": [{"node": …}], "pageInfo":
//!   {"hasNextPage": …, "endCursor": …}, "totalCount": …}}}`
//! - flat style:
//!   `{"items": […], "has_more": …, "next_cursor": …, "total_count": …}`
//!
//! The collection name under `data` varies per endpoint; the connection
//! is recognized as the first object carrying an `edges` array.

use pagesync_core::{Cursor, FetchError, PageResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct FlatEnvelope<T> {
    items: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    #[serde(rename = "totalCount", default)]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor", default)]
    end_cursor: Option<String>,
}

/// Decode a response body into the canonical page shape.
///
/// # Errors
/// `FetchError::Validation` when the body matches neither envelope or an
/// envelope's inner structure is malformed.
pub fn normalize<T: DeserializeOwned>(value: Value) -> Result<PageResult<T>, FetchError> {
    if value.get("items").is_some() {
        let flat: FlatEnvelope<T> = serde_json::from_value(value)
            .map_err(|e| FetchError::validation(format!("flat envelope: {e}")))?;

        let mut page = PageResult::new(flat.items).with_has_more(flat.has_more);
        if let Some(cursor) = flat.next_cursor {
            page = page.with_next_cursor(cursor);
        }
        if let Some(total) = flat.total_count {
            page = page.with_total_count(total);
        }
        return Ok(page);
    }

    if let Some(data) = value.get("data") {
        let connection = find_connection(data)
            .ok_or_else(|| FetchError::validation("no connection object under data"))?;
        let connection: Connection<T> = serde_json::from_value(connection.clone())
            .map_err(|e| FetchError::validation(format!("connection envelope: {e}")))?;

        let mut page: PageResult<T> =
            PageResult::new(connection.edges.into_iter().map(|e| e.node).collect())
                .with_has_more(connection.page_info.has_next_page);
        if let Some(cursor) = connection.page_info.end_cursor {
            page = page.with_next_cursor(Cursor::new(cursor));
        }
        if let Some(total) = connection.total_count {
            page = page.with_total_count(total);
        }
        return Ok(page);
    }

    Err(FetchError::validation("unrecognized pagination envelope"))
}

fn find_connection(data: &Value) -> Option<&Value> {
    if data.get("edges").is_some() {
        return Some(data);
    }
    data.as_object()?.values().find(|v| v.get("edges").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: u64,
        name: String,
    }

    #[test]
    fn flat_envelope_normalizes() {
        let body = json!({
            "items": [{"id": 1, "name": "alpha"}, {"id": 2, "name": "beta"}],
            "has_more": true,
            "next_cursor": "c1",
            "total_count": 40
        });

        let page: PageResult<Item> = normalize(body).unwrap();
        assert_eq!(page.len(), 2);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(Cursor::new("c1")));
        assert_eq!(page.total_count, Some(40));
    }

    #[test]
    fn flat_envelope_defaults_to_terminal_page() {
        let body = json!({"items": [{"id": 1, "name": "only"}]});

        let page: PageResult<Item> = normalize(body).unwrap();
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.total_count, None);
    }

    #[test]
    fn connection_envelope_normalizes() {
        let body = json!({
            "data": {
                "experiments": {
                    "edges": [
                        {"node": {"id": 7, "name": "warmup"}, "cursor": "e7"},
                        {"node": {"id": 8, "name": "main"}, "cursor": "e8"}
                    ],
                    "pageInfo": {"hasNextPage": true, "endCursor": "e8"},
                    "totalCount": 120
                }
            }
        });

        let page: PageResult<Item> = normalize(body).unwrap();
        assert_eq!(page.items[1].name, "main");
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(Cursor::new("e8")));
        assert_eq!(page.total_count, Some(120));
    }

    #[test]
    fn connection_collection_name_is_irrelevant() {
        let body = json!({
            "data": {
                "chatTranscripts": {
                    "edges": [],
                    "pageInfo": {"hasNextPage": false}
                }
            }
        });

        let page: PageResult<Item> = normalize(body).unwrap();
        assert!(page.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn unknown_envelope_is_a_validation_error() {
        let err = normalize::<Item>(json!({"rows": []})).unwrap_err();
        assert!(matches!(err, FetchError::Validation { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_connection_is_a_validation_error() {
        let body = json!({
            "data": {"things": {"edges": [{"no_node": 1}], "pageInfo": {"hasNextPage": false}}}
        });
        let err = normalize::<Item>(body).unwrap_err();
        assert!(matches!(err, FetchError::Validation { .. }));
    }

    #[test]
    fn data_without_edges_is_a_validation_error() {
        let err = normalize::<Item>(json!({"data": {"viewer": {"id": 1}}})).unwrap_err();
        assert!(matches!(err, FetchError::Validation { .. }));
    }
}
