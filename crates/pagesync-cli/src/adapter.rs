//! View adapter over untyped JSON records
//!
//! The CLI does not know the schema of the collection it syncs, so items
//! stay as raw JSON objects and field access is configured by flags.

use pagesync_core::{SortValue, ViewAdapter};
use serde_json::Value;

/// Field-driven adapter for `serde_json::Value` items
pub struct JsonFieldAdapter {
    search_fields: Vec<String>,
    timestamp_field: String,
}

impl JsonFieldAdapter {
    /// Search over `search_fields`; default-order by `timestamp_field`
    pub fn new(search_fields: Vec<String>, timestamp_field: impl Into<String>) -> Self {
        Self {
            search_fields,
            timestamp_field: timestamp_field.into(),
        }
    }

    fn value_of(item: &Value, key: &str) -> Option<SortValue> {
        match item.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .map(SortValue::Int)
                .or_else(|| n.as_f64().map(SortValue::Float)),
            Value::String(s) => Some(SortValue::Text(s.clone())),
            Value::Bool(b) => Some(SortValue::Int(i64::from(*b))),
            _ => None,
        }
    }
}

impl ViewAdapter<Value> for JsonFieldAdapter {
    fn search_text(&self, item: &Value) -> Vec<String> {
        self.search_fields
            .iter()
            .filter_map(|field| item.get(field))
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    fn sort_value(&self, item: &Value, key: &str) -> Option<SortValue> {
        Self::value_of(item, key)
    }

    fn default_sort_value(&self, item: &Value) -> SortValue {
        Self::value_of(item, &self.timestamp_field).unwrap_or(SortValue::Int(0))
    }
}
