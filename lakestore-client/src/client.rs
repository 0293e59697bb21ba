//! Store client abstraction trait.

use crate::error::StoreResult;
use async_trait::async_trait;
use lakestore_types::{ItemKind, SourcePaths, StorePath};

/// Remote file-store capabilities used by the file-system commands.
///
/// Every call is one round trip; callers await each before issuing the next.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Returns the name of the store provider.
    fn provider_name(&self) -> &'static str;

    /// Reports whether `path` is absent, a file, or a directory.
    ///
    /// A missing path is `ItemKind::Absent`, never an error.
    async fn probe(&self, path: &StorePath) -> StoreResult<ItemKind>;

    /// Deletes the item at `path`.
    async fn delete(&self, path: &StorePath, recursive: bool) -> StoreResult<()>;

    /// Merges `sources`, in order, into a new file at `destination`.
    async fn concatenate(&self, destination: &StorePath, sources: &SourcePaths)
    -> StoreResult<()>;
}
