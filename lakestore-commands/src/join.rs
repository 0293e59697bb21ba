//! Concatenate store files into one destination file.
//!
//! The only decision made client-side is whether to remove an existing
//! destination first. That happens only when overwrite was requested and the
//! probe reports a file. A directory destination is never removed: the
//! concatenate call is still made and the store's conflict error is returned.
//!
//! The three store calls are not transactional. If concatenation fails after
//! the old destination was deleted, the destination stays absent.

use lakestore_client::{StoreClient, StoreError, StoreResult};
use lakestore_types::{ItemKind, SourcePaths, StorePath};
use std::fmt;
use tracing::{debug, info, warn};

/// A validated concatenation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub destination: StorePath,
    pub sources: SourcePaths,
    /// Allow an existing destination file to be removed first.
    pub overwrite: bool,
}

impl JoinRequest {
    pub fn new(destination: StorePath, sources: SourcePaths, overwrite: bool) -> StoreResult<Self> {
        if destination.is_root() {
            return Err(StoreError::InvalidArgument(
                "the root cannot be a concatenation destination".to_string(),
            ));
        }
        Ok(Self {
            destination,
            sources,
            overwrite,
        })
    }

    /// Builds a request from raw path strings.
    ///
    /// Fails with `InvalidArgument` on a malformed path or an empty source list.
    pub fn parse<I, S>(destination: &str, sources: I, overwrite: bool) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let destination = StorePath::parse(destination)?;
        let sources = SourcePaths::parse(sources)?;
        Self::new(destination, sources, overwrite)
    }
}

/// Progress of a single join, used in failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStage {
    Start,
    Probed(ItemKind),
    Deleted,
    Concatenated,
}

impl fmt::Display for JoinStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinStage::Start => f.write_str("start"),
            JoinStage::Probed(kind) => write!(f, "probed ({kind})"),
            JoinStage::Deleted => f.write_str("deleted"),
            JoinStage::Concatenated => f.write_str("concatenated"),
        }
    }
}

/// Concatenates `request.sources`, in order, into `request.destination`.
///
/// Returns the destination path. Every store error is returned unchanged and
/// aborts the remaining steps.
pub async fn concatenate<S>(store: &S, request: &JoinRequest) -> StoreResult<StorePath>
where
    S: StoreClient + ?Sized,
{
    let mut stage = JoinStage::Start;
    match run(store, request, &mut stage).await {
        Ok(()) => {
            info!(
                "Concatenated {} sources into {} ({})",
                request.sources.as_slice().len(),
                request.destination,
                store.provider_name()
            );
            Ok(request.destination.clone())
        }
        Err(err) => {
            if stage == JoinStage::Deleted {
                warn!(
                    "Concatenation into {} failed after the existing file was deleted; destination is now absent: {}",
                    request.destination, err
                );
            } else {
                debug!("Join into {} failed at stage {}: {}", request.destination, stage, err);
            }
            Err(err)
        }
    }
}

async fn run<S>(store: &S, request: &JoinRequest, stage: &mut JoinStage) -> StoreResult<()>
where
    S: StoreClient + ?Sized,
{
    let destination = &request.destination;

    if request.overwrite {
        // Probe errors abort; they are never read as Absent.
        let kind = store.probe(destination).await?;
        *stage = JoinStage::Probed(kind);
        debug!("Destination {} probed as {}", destination, kind);

        match kind {
            ItemKind::File => {
                store.delete(destination, false).await?;
                *stage = JoinStage::Deleted;
                info!("Removed existing destination file {}", destination);
            }
            ItemKind::Directory => {
                debug!("Destination {} is a directory; not removing it", destination);
            }
            ItemKind::Absent => {}
        }
    }

    store.concatenate(destination, &request.sources).await?;
    *stage = JoinStage::Concatenated;
    Ok(())
}

/// Parses raw paths and runs [`concatenate`].
///
/// Invalid input fails before any store call is made.
pub async fn join_paths<S, I, P>(
    store: &S,
    destination: &str,
    sources: I,
    overwrite: bool,
) -> StoreResult<StorePath>
where
    S: StoreClient + ?Sized,
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    let request = JoinRequest::parse(destination, sources, overwrite)?;
    concatenate(store, &request).await
}
