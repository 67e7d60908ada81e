//! Pagesync Core - Cursor-paginated collection synchronization
//!
//! The data-synchronization layer behind the admin console's list views:
//! - Incremental page loading against cursor-paginated endpoints
//! - Single-flight guarded accumulation (no duplicate or interleaved pages)
//! - Bounded exponential-backoff retry around each page fetch
//! - Search-driven full materialization with coverage reporting
//! - Pure filter/sort projection for display
//!
//! # Example
//!
//! ```rust,ignore
//! use pagesync_core::{CollectionSync, SyncConfig};
//!
//! # async fn example(fetcher: impl pagesync_core::PageFetcher<String>) -> Result<(), Box<dyn std::error::Error>> {
//! let sync = CollectionSync::new(fetcher, SyncConfig::new().with_page_size(200));
//!
//! sync.load_first_page().await?;
//! while sync.snapshot().has_more {
//!     sync.load_next_page().await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod fetch;
pub mod materialize;
pub mod page;
pub mod phase;
pub mod retry;
pub mod state;
pub mod sync;
pub mod view;

// Re-exports for convenience
pub use error::{FetchError, SyncError};
pub use fetch::PageFetcher;
pub use materialize::{coverage, DrainOutcome, DrainReport, SearchCoverage};
pub use page::{Cursor, PageResult};
pub use phase::{allowed_transitions, validate_transition, PhaseError, SyncPhase};
pub use retry::{retry_with_backoff, RetryPolicy, Retryable};
pub use state::CollectionSnapshot;
pub use sync::{CollectionSync, LoadOutcome, SkipReason, SyncConfig};
pub use view::{project, FilterState, SortDirection, SortValue, ViewAdapter};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Pagesync Core
    pub use crate::{
        coverage, project, CollectionSnapshot, CollectionSync, Cursor, FetchError, FilterState,
        LoadOutcome, PageFetcher, PageResult, RetryPolicy, SearchCoverage, SyncConfig, SyncError,
        SyncPhase, ViewAdapter,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
