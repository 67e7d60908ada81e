//! Page types for cursor-paginated endpoints
//!
//! A [`PageResult`] is the normalized outcome of exactly one network call,
//! regardless of which wire envelope the endpoint speaks.

use serde::{Deserialize, Serialize};

/// Opaque continuation token returned by a paginated endpoint.
///
/// The value is implementation-specific and is never parsed; it is only
/// echoed back to request the next page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    /// Create a cursor from a raw token
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of results, immutable once returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Continuation token for the next page, if the server provided one
    pub next_cursor: Option<Cursor>,
    /// Whether the server reports further pages
    pub has_more: bool,
    /// Server-reported total, for progress display only
    pub total_count: Option<u64>,
}

impl<T> PageResult<T> {
    /// Create a terminal page (no continuation)
    #[inline]
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            has_more: false,
            total_count: None,
        }
    }

    /// With continuation cursor
    #[inline]
    #[must_use]
    pub fn with_next_cursor(mut self, cursor: impl Into<Cursor>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// With the server's has-more flag
    #[inline]
    #[must_use]
    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    /// With the server-reported total
    #[inline]
    #[must_use]
    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }

    /// Number of items in this page
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_builder() {
        let page = PageResult::new(vec![1, 2, 3])
            .with_next_cursor("c1")
            .with_has_more(true)
            .with_total_count(9);

        assert_eq!(page.len(), 3);
        assert_eq!(page.next_cursor, Some(Cursor::new("c1")));
        assert!(page.has_more);
        assert_eq!(page.total_count, Some(9));
    }

    #[test]
    fn cursor_is_opaque_round_trip() {
        let cursor = Cursor::new("eyJvZmZzZXQiOjEwMH0=");
        assert_eq!(cursor.as_str(), "eyJvZmZzZXQiOjEwMH0=");
        assert_eq!(cursor.to_string(), "eyJvZmZzZXQiOjEwMH0=");
    }
}
