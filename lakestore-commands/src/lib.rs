//! File-system commands built on a [`StoreClient`].
//!
//! Each command validates its typed request up front, then drives the store
//! through a fixed sequence of awaited calls. Commands keep no state between
//! invocations.
//!
//! # Example
//!
//! ```
//! use lakestore_client::MemoryStore;
//! use lakestore_commands::join::{concatenate, JoinRequest};
//! use lakestore_types::StorePath;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! store.put_file(&StorePath::parse("/a/1.txt").unwrap(), b"1").await.unwrap();
//! store.put_file(&StorePath::parse("/a/2.txt").unwrap(), b"2").await.unwrap();
//!
//! let request = JoinRequest::parse("/a/out.txt", ["/a/1.txt", "/a/2.txt"], false).unwrap();
//! let destination = concatenate(&store, &request).await.unwrap();
//! assert_eq!(destination.as_str(), "/a/out.txt");
//! # });
//! ```
//!
//! [`StoreClient`]: lakestore_client::StoreClient

pub mod join;

pub use join::{concatenate, join_paths, JoinRequest, JoinStage};
