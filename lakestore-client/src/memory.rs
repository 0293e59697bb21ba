//! In-process store.
//!
//! Keeps a hierarchical namespace in memory and applies the same rules a
//! remote store applies to delete and concatenate. Used as a test double.

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use lakestore_types::{ItemKind, SourcePaths, StorePath};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory,
}

/// In-memory hierarchical store. The root always exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: Arc<RwLock<BTreeMap<StorePath, Node>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a file, creating missing parent directories.
    pub async fn put_file(&self, path: &StorePath, content: &[u8]) -> StoreResult<()> {
        let mut nodes = self.nodes.write().await;
        if path.is_root() || matches!(nodes.get(path), Some(Node::Directory)) {
            return Err(StoreError::DestinationConflict(format!(
                "{path} is a directory"
            )));
        }
        create_ancestors(&mut nodes, path)?;
        nodes.insert(path.clone(), Node::File(content.to_vec()));
        Ok(())
    }

    /// Creates a directory and any missing parents.
    pub async fn create_dir(&self, path: &StorePath) -> StoreResult<()> {
        if path.is_root() {
            return Ok(());
        }
        let mut nodes = self.nodes.write().await;
        if matches!(nodes.get(path), Some(Node::File(_))) {
            return Err(StoreError::DestinationConflict(format!("{path} is a file")));
        }
        create_ancestors(&mut nodes, path)?;
        nodes.insert(path.clone(), Node::Directory);
        Ok(())
    }

    /// Returns a file's content, or `None` if `path` is not a file.
    pub async fn read_file(&self, path: &StorePath) -> Option<Vec<u8>> {
        match self.nodes.read().await.get(path) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// All stored paths in lexical order, root excluded.
    pub async fn paths(&self) -> Vec<StorePath> {
        self.nodes.read().await.keys().cloned().collect()
    }
}

fn kind_of(nodes: &BTreeMap<StorePath, Node>, path: &StorePath) -> ItemKind {
    if path.is_root() {
        return ItemKind::Directory;
    }
    match nodes.get(path) {
        Some(Node::File(_)) => ItemKind::File,
        Some(Node::Directory) => ItemKind::Directory,
        None => ItemKind::Absent,
    }
}

fn create_ancestors(nodes: &mut BTreeMap<StorePath, Node>, path: &StorePath) -> StoreResult<()> {
    for ancestor in path.ancestors() {
        match kind_of(nodes, &ancestor) {
            ItemKind::Directory => {}
            ItemKind::File => {
                return Err(StoreError::DestinationConflict(format!(
                    "parent {ancestor} of {path} is a file"
                )));
            }
            ItemKind::Absent => {
                nodes.insert(ancestor, Node::Directory);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl StoreClient for MemoryStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn probe(&self, path: &StorePath) -> StoreResult<ItemKind> {
        Ok(kind_of(&*self.nodes.read().await, path))
    }

    async fn delete(&self, path: &StorePath, recursive: bool) -> StoreResult<()> {
        if path.is_root() {
            return Err(StoreError::InvalidArgument(
                "the root cannot be deleted".to_string(),
            ));
        }

        let mut nodes = self.nodes.write().await;
        match kind_of(&nodes, path) {
            ItemKind::Absent => Err(StoreError::TransportFailure(format!(
                "store refused to delete {path}: not found"
            ))),
            ItemKind::File => {
                nodes.remove(path);
                debug!("Deleted file {}", path);
                Ok(())
            }
            ItemKind::Directory => {
                let children: Vec<StorePath> = nodes
                    .keys()
                    .filter(|p| p.is_descendant_of(path))
                    .cloned()
                    .collect();
                if !children.is_empty() && !recursive {
                    return Err(StoreError::InvalidArgument(format!(
                        "{path} is a non-empty directory"
                    )));
                }
                for child in &children {
                    nodes.remove(child);
                }
                nodes.remove(path);
                debug!("Deleted directory {} ({} children)", path, children.len());
                Ok(())
            }
        }
    }

    async fn concatenate(
        &self,
        destination: &StorePath,
        sources: &SourcePaths,
    ) -> StoreResult<()> {
        let mut nodes = self.nodes.write().await;

        let existing = kind_of(&nodes, destination);
        if existing.exists() {
            return Err(StoreError::DestinationConflict(format!(
                "{destination} already exists as a {existing}"
            )));
        }

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for source in sources {
            if !seen.insert(source) {
                return Err(StoreError::InvalidArgument(format!(
                    "{source} is listed more than once"
                )));
            }
            match nodes.get(source) {
                Some(Node::File(content)) => merged.extend_from_slice(content),
                Some(Node::Directory) => {
                    return Err(StoreError::SourceMissing(format!("{source} is a directory")));
                }
                None => {
                    return Err(StoreError::SourceMissing(format!("{source} does not exist")));
                }
            }
        }

        create_ancestors(&mut nodes, destination)?;
        for source in sources {
            nodes.remove(source);
        }
        nodes.insert(destination.clone(), Node::File(merged));

        debug!(
            "Concatenated {} sources into {}",
            sources.as_slice().len(),
            destination
        );
        Ok(())
    }
}
