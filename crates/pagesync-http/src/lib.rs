//! Pagesync HTTP - the network boundary
//!
//! Implements the core's [`PageFetcher`](pagesync_core::PageFetcher) seam
//! over HTTP:
//! - One `GET <endpoint>?limit=<n>[&after=<cursor>]` per page
//! - Bearer credential from a pluggable token provider
//! - Normalization of both supported pagination envelopes
//!
//! All wire-schema knowledge lives in this crate; nothing above the
//! fetcher seam ever sees an envelope.

#![warn(unreachable_pub)]

pub mod client;
pub mod envelope;
pub mod token;

pub use client::HttpPageFetcher;
pub use envelope::normalize;
pub use token::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
