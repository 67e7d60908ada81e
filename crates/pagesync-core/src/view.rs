//! View projection
//!
//! Pure derived computation: given accumulated items plus filter/sort
//! state, produce the display sequence. Stateless; recomputed on every
//! state change. The projector never exposes raw arrival order — with no
//! sort key selected it falls back to the adapter's default ordering,
//! because pages can arrive in natural-key order rather than display
//! order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for an explicitly selected key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

/// Filter and sort state, owned by the view layer
///
/// Lifecycle is independent of the collection state: a reload does not
/// reset the user's search term or sort selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    sort: Option<(String, SortDirection)>,
}

impl FilterState {
    /// Create empty filter state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search term
    #[inline]
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Set the search term
    #[inline]
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Currently selected sort key
    #[inline]
    #[must_use]
    pub fn sort_key(&self) -> Option<&str> {
        self.sort.as_ref().map(|(key, _)| key.as_str())
    }

    /// Direction of the current sort selection
    #[inline]
    #[must_use]
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.as_ref().map(|(_, direction)| *direction)
    }

    /// Cycle the sort selection for `key`, matching header-click UX:
    /// repeated selection of the same key goes `asc -> desc -> none`;
    /// selecting a different key always starts at `asc`.
    pub fn cycle_sort(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some((current, SortDirection::Asc)) if current == key => {
                Some((current, SortDirection::Desc))
            }
            Some((current, SortDirection::Desc)) if current == key => None,
            _ => Some((key.to_string(), SortDirection::Asc)),
        };
    }

    /// Clear the sort selection
    #[inline]
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Set an explicit sort selection
    #[inline]
    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.sort = Some((key.into(), direction));
    }
}

/// Comparable value extracted from an item for sorting
#[derive(Debug, Clone)]
pub enum SortValue {
    /// Integer-valued field (ids, counts, unix timestamps)
    Int(i64),
    /// Float-valued field; ordered with total ordering
    Float(f64),
    /// Text-valued field
    Text(String),
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            // Numbers sort before text when a key is heterogeneous
            (Text(_), _) => Ordering::Greater,
            (_, Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

/// Caller-supplied mapping from items to searchable text and sortable
/// values
pub trait ViewAdapter<T> {
    /// Designated text fields matched by the search term
    fn search_text(&self, item: &T) -> Vec<String>;

    /// Comparable value for the given sort key, if the item carries one.
    /// Items without a value for the key sort after those with one.
    fn sort_value(&self, item: &T, key: &str) -> Option<SortValue>;

    /// Value driving the default display ordering (sorted descending);
    /// typically a creation timestamp for console records.
    fn default_sort_value(&self, item: &T) -> SortValue;
}

/// Project accumulated items through the filter/sort state.
///
/// 1. Keep an item iff the term is empty or matches any designated field,
///    case-insensitively.
/// 2. Stable-sort by the selected key; ties keep insertion order.
/// 3. With no key selected, fall back to the adapter's default ordering,
///    descending.
#[must_use]
pub fn project<'a, T, A>(items: &'a [T], filter: &FilterState, adapter: &A) -> Vec<&'a T>
where
    A: ViewAdapter<T>,
{
    let needle = filter.search_term().to_lowercase();
    let mut projected: Vec<&T> = items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || adapter
                    .search_text(item)
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect();

    match &filter.sort {
        Some((key, direction)) => {
            // sort_by is stable; ties keep insertion order in both
            // directions because only the comparator is reversed.
            projected.sort_by(|a, b| {
                let ordering = compare_by_key(adapter, a, b, key);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        None => {
            projected.sort_by(|a, b| {
                adapter
                    .default_sort_value(b)
                    .cmp(&adapter.default_sort_value(a))
            });
        }
    }
    projected
}

fn compare_by_key<T, A: ViewAdapter<T>>(adapter: &A, a: &T, b: &T, key: &str) -> Ordering {
    match (adapter.sort_value(a, key), adapter.sort_value(b, key)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        // Missing values always sort last, regardless of direction
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        score: i64,
        created_at: i64,
    }

    struct RowAdapter;

    impl ViewAdapter<Row> for RowAdapter {
        fn search_text(&self, item: &Row) -> Vec<String> {
            vec![item.name.to_string()]
        }

        fn sort_value(&self, item: &Row, key: &str) -> Option<SortValue> {
            match key {
                "name" => Some(SortValue::Text(item.name.to_string())),
                "score" => Some(SortValue::Int(item.score)),
                _ => None,
            }
        }

        fn default_sort_value(&self, item: &Row) -> SortValue {
            SortValue::Int(item.created_at)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "alpha", score: 3, created_at: 10 },
            Row { name: "Beta", score: 1, created_at: 30 },
            Row { name: "gamma", score: 3, created_at: 20 },
            Row { name: "ALPHABET", score: 2, created_at: 40 },
        ]
    }

    #[test]
    fn empty_term_keeps_everything() {
        let rows = rows();
        let projected = project(&rows, &FilterState::new(), &RowAdapter);
        assert_eq!(projected.len(), 4);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let rows = rows();
        let mut filter = FilterState::new();
        filter.set_search_term("ALPHA");

        let projected = project(&rows, &filter, &RowAdapter);
        let names: Vec<_> = projected.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["ALPHABET", "alpha"]);
    }

    #[test]
    fn default_order_is_descending_by_creation() {
        let rows = rows();
        let projected = project(&rows, &FilterState::new(), &RowAdapter);
        let created: Vec<_> = projected.iter().map(|r| r.created_at).collect();
        assert_eq!(created, vec![40, 30, 20, 10]);
    }

    #[test]
    fn stable_sort_breaks_ties_by_insertion_order() {
        let rows = rows();
        let mut filter = FilterState::new();
        filter.set_sort("score", SortDirection::Asc);

        let projected = project(&rows, &filter, &RowAdapter);
        let names: Vec<_> = projected.iter().map(|r| r.name).collect();
        // alpha and gamma tie on score; alpha arrived first
        assert_eq!(names, vec!["Beta", "ALPHABET", "alpha", "gamma"]);
    }

    #[test]
    fn desc_reverses_comparator() {
        let rows = rows();
        let mut filter = FilterState::new();
        filter.set_sort("name", SortDirection::Desc);

        let projected = project(&rows, &filter, &RowAdapter);
        let names: Vec<_> = projected.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["gamma", "alpha", "Beta", "ALPHABET"]);
    }

    #[test]
    fn missing_sort_values_go_last() {
        let rows = rows();
        let mut filter = FilterState::new();
        filter.set_sort("unknown-key", SortDirection::Asc);

        let projected = project(&rows, &filter, &RowAdapter);
        // all values missing: insertion order preserved
        let names: Vec<_> = projected.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alpha", "Beta", "gamma", "ALPHABET"]);
    }

    #[test]
    fn sort_cycle_same_key() {
        let mut filter = FilterState::new();

        filter.cycle_sort("name");
        assert_eq!(filter.sort_key(), Some("name"));
        assert_eq!(filter.sort_direction(), Some(SortDirection::Asc));

        filter.cycle_sort("name");
        assert_eq!(filter.sort_direction(), Some(SortDirection::Desc));

        filter.cycle_sort("name");
        assert_eq!(filter.sort_key(), None);
        assert_eq!(filter.sort_direction(), None);
    }

    #[test]
    fn sort_cycle_different_key_starts_ascending() {
        let mut filter = FilterState::new();

        filter.cycle_sort("name");
        filter.cycle_sort("name");
        assert_eq!(filter.sort_direction(), Some(SortDirection::Desc));

        filter.cycle_sort("score");
        assert_eq!(filter.sort_key(), Some("score"));
        assert_eq!(filter.sort_direction(), Some(SortDirection::Asc));
    }

    #[test]
    fn sort_value_cross_type_ordering() {
        assert_eq!(SortValue::Int(2).cmp(&SortValue::Float(2.0)), Ordering::Equal);
        assert!(SortValue::Int(1) < SortValue::Float(1.5));
        assert!(SortValue::Int(100) < SortValue::Text("a".to_string()));
    }
}
