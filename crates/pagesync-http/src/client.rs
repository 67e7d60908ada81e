//! HTTP page fetcher
//!
//! One `GET` per [`fetch_page`](PageFetcher::fetch_page) call, no internal
//! retry; the synchronizer composes the backoff policy around it.

use crate::envelope;
use crate::token::TokenProvider;
use async_trait::async_trait;
use pagesync_core::{Cursor, FetchError, PageFetcher, PageResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;

const BODY_SNIPPET_LEN: usize = 200;

/// Page fetcher for a single cursor-paginated endpoint
pub struct HttpPageFetcher<T, P> {
    client: reqwest::Client,
    endpoint: String,
    tokens: P,
    _item: PhantomData<fn() -> T>,
}

impl<T, P> HttpPageFetcher<T, P>
where
    P: TokenProvider,
{
    /// Create a fetcher for `endpoint` (full URL of the collection)
    #[must_use]
    pub fn new(endpoint: impl Into<String>, tokens: P) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint: endpoint.into(),
            tokens,
            _item: PhantomData,
        }
    }

    /// With a pre-configured client (shared pools, custom timeouts)
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Endpoint this fetcher targets
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl<T, P> PageFetcher<T> for HttpPageFetcher<T, P>
where
    T: DeserializeOwned + Send + Sync,
    P: TokenProvider,
{
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<PageResult<T>, FetchError> {
        // A missing credential is an auth failure before any request
        let token = self
            .tokens
            .bearer_token()
            .ok_or(FetchError::Auth { status: 401 })?;

        let mut request = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token)
            .query(&[("limit", page_size.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("after", cursor.as_str())]);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            cursor = cursor.map(Cursor::as_str),
            page_size,
            "requesting page"
        );

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(FetchError::Auth { status });
        }
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
            return Err(FetchError::server(status, snippet));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                FetchError::validation(e.to_string())
            } else {
                FetchError::network(e.to_string())
            }
        })?;
        envelope::normalize(body)
    }
}
