//! Shared test utilities for command tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lakestore_client::{MemoryStore, StoreClient, StoreError, StoreResult};
use lakestore_types::{ItemKind, SourcePaths, StorePath};
use std::sync::Mutex;

/// A store call as observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Probe(String),
    Delete(String, bool),
    Concatenate(String, Vec<String>),
}

/// Which call an injected failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Probe,
    Delete,
    Concatenate,
}

/// Wraps a [`MemoryStore`], logging every call and optionally failing one.
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    fail_on: Option<FailOn>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing(inner: MemoryStore, fail_on: FailOn) -> Self {
        Self {
            fail_on: Some(fail_on),
            ..Self::new(inner)
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Delete(..)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn injected(&self, op: FailOn) -> StoreResult<()> {
        if self.fail_on == Some(op) {
            return Err(StoreError::TransportFailure(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreClient for RecordingStore {
    fn provider_name(&self) -> &'static str {
        "recording"
    }

    async fn probe(&self, path: &StorePath) -> StoreResult<ItemKind> {
        self.record(Call::Probe(path.to_string()));
        self.injected(FailOn::Probe)?;
        self.inner.probe(path).await
    }

    async fn delete(&self, path: &StorePath, recursive: bool) -> StoreResult<()> {
        self.record(Call::Delete(path.to_string(), recursive));
        self.injected(FailOn::Delete)?;
        self.inner.delete(path, recursive).await
    }

    async fn concatenate(
        &self,
        destination: &StorePath,
        sources: &SourcePaths,
    ) -> StoreResult<()> {
        self.record(Call::Concatenate(
            destination.to_string(),
            sources.iter().map(ToString::to_string).collect(),
        ));
        self.injected(FailOn::Concatenate)?;
        self.inner.concatenate(destination, sources).await
    }
}

pub fn store_path(raw: &str) -> StorePath {
    StorePath::parse(raw).unwrap()
}

/// A store holding `/a/1.txt`, `/a/2.txt` and `/a/3.txt`.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (name, content) in [("1", "one\n"), ("2", "two\n"), ("3", "three\n")] {
        store
            .put_file(&store_path(&format!("/a/{name}.txt")), content.as_bytes())
            .await
            .unwrap();
    }
    store
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("lakestore_commands=debug,lakestore_client=debug")
        .with_test_writer()
        .try_init();
}
