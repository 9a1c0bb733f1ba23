//! NSE upstream
//!
//! Fetches index snapshots from the NSE India website

mod client;
mod types;

pub use client::{FetchError, NseClient, INDEX_PATH};
pub use types::{IndexRow, IndexSnapshot};

use async_trait::async_trait;

/// Trait for index snapshot sources
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current snapshot of an index
    async fn fetch_index(&self, index: &str) -> Result<IndexSnapshot, FetchError>;
}
