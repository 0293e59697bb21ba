//! Store client layer for lakestore.
//!
//! Defines the capabilities the file-system commands need from a remote
//! hierarchical store, and ships two implementations:
//! - [`WebHdfsStore`]: REST client for WebHDFS-compatible endpoints
//! - [`MemoryStore`]: in-process store that enforces the same rules
//!
//! # Example
//!
//! ```
//! use lakestore_client::{MemoryStore, StoreClient};
//! use lakestore_types::{ItemKind, StorePath};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! let path = StorePath::parse("/a/1.txt").unwrap();
//! store.put_file(&path, b"one").await.unwrap();
//! assert_eq!(store.probe(&path).await.unwrap(), ItemKind::File);
//! # });
//! ```

mod client;
mod error;
pub mod memory;
pub mod webhdfs;

pub use client::StoreClient;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use webhdfs::{WebHdfsConfig, WebHdfsStore};
