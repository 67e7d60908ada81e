//! Page fetcher seam
//!
//! The synchronizer reaches the network through this trait only. An
//! implementation performs exactly one request per call and never retries
//! internally; retry is composed around it by the synchronizer.

use crate::error::FetchError;
use crate::page::{Cursor, PageResult};
use async_trait::async_trait;

/// One-shot page fetch against a cursor-paginated endpoint
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch a single page.
    ///
    /// `cursor` is `None` for the first page. Implementations own all
    /// knowledge of the wire envelope and must return the normalized
    /// [`PageResult`] shape.
    ///
    /// # Errors
    /// - `FetchError::Network` on transport failure
    /// - `FetchError::Server` on a non-2xx response
    /// - `FetchError::Auth` when the credential is missing or rejected
    /// - `FetchError::Validation` when the response shape is malformed
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<PageResult<T>, FetchError>;
}
