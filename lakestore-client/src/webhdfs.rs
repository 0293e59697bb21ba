//! WebHDFS-compatible REST store client.
//!
//! Talks to `{base}/webhdfs/v1{path}?op=...` endpoints. Failed requests carry
//! a `RemoteException` JSON body which is mapped onto [`StoreError`].

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use lakestore_types::{ItemKind, SourcePaths, StorePath};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for a WebHDFS-compatible account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebHdfsConfig {
    /// Store account name; the first label of the account host.
    pub account: String,
    /// DNS suffix appended to the account name.
    pub endpoint_suffix: String,
    /// Overrides `https://{account}.{endpoint_suffix}` (e.g. a local mock).
    pub base_url: Option<String>,
    /// Bearer token sent with every request, if set.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for WebHdfsConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            endpoint_suffix: "azuredatalakestore.net".to_string(),
            base_url: None,
            access_token: None,
            timeout_secs: 60,
        }
    }
}

impl WebHdfsConfig {
    /// Host name of the account, used for fully-qualified paths.
    #[must_use]
    pub fn host(&self) -> String {
        format!("{}.{}", self.account, self.endpoint_suffix)
    }

    /// Base URL requests are sent to, without a trailing `/`.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host()),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.account.is_empty() {
            return Err(StoreError::Config("account name is required".to_string()));
        }
        if !self
            .account
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(StoreError::Config(format!(
                "invalid account name: {}",
                self.account
            )));
        }
        if self.endpoint_suffix.is_empty() {
            return Err(StoreError::Config("endpoint suffix is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Which store call produced a response; decides how 404s are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Probe,
    Delete,
    Concatenate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Probe => "probe",
            Operation::Delete => "delete",
            Operation::Concatenate => "concatenate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Deserialize)]
struct FileStatusResponse {
    #[serde(rename = "FileStatus")]
    file_status: FileStatus,
}

#[derive(Debug, Deserialize)]
struct FileStatus {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct BooleanResponse {
    boolean: bool,
}

#[derive(Debug, Serialize)]
struct ConcatRequest<'a> {
    sources: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RemoteExceptionResponse {
    #[serde(rename = "RemoteException")]
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
struct RemoteException {
    exception: String,
    #[serde(default)]
    message: String,
}

/// REST store client.
pub struct WebHdfsStore {
    config: WebHdfsConfig,
    client: Client,
}

impl WebHdfsStore {
    /// Creates a client after validating `config`.
    pub fn new(config: WebHdfsConfig) -> StoreResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn url_for(&self, path: &StorePath) -> String {
        let encoded: Vec<String> = path
            .as_str()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/webhdfs/v1{}", self.config.api_base_url(), encoded.join("/"))
    }

    fn request(&self, method: Method, path: &StorePath, op: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.url_for(path))
            .query(&[("op", op)]);
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turns a non-success response into the matching [`StoreError`].
    async fn remote_error(response: Response, op: Operation, path: &StorePath) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let remote = serde_json::from_str::<RemoteExceptionResponse>(&body)
            .ok()
            .map(|r| r.remote_exception);
        classify(op, path, status, remote, &body)
    }
}

/// A 404 is only `Absent` when the store itself says the path is missing.
///
/// Any other 404 body (a gateway page, a wrong base URL) is a transport failure.
async fn absent_or_error(response: Response, path: &StorePath) -> StoreResult<ItemKind> {
    let body = response.text().await.unwrap_or_default();
    if missing_path_body(&body) {
        return Ok(ItemKind::Absent);
    }
    Err(StoreError::TransportFailure(format!(
        "probe {path}: unexpected 404 response: {body}"
    )))
}

fn missing_path_body(body: &str) -> bool {
    if body.trim().is_empty() {
        return true;
    }
    serde_json::from_str::<RemoteExceptionResponse>(body)
        .is_ok_and(|r| r.remote_exception.exception == "FileNotFoundException")
}

fn classify(
    op: Operation,
    path: &StorePath,
    status: StatusCode,
    remote: Option<RemoteException>,
    body: &str,
) -> StoreError {
    let detail = match &remote {
        Some(e) if !e.message.is_empty() => e.message.clone(),
        Some(e) => e.exception.clone(),
        None if body.is_empty() => format!("status {status}"),
        None => body.to_string(),
    };
    let message = format!("{op} {path}: {detail}");

    if let Some(remote) = &remote {
        match remote.exception.as_str() {
            "FileAlreadyExistsException" => return StoreError::DestinationConflict(message),
            "FileNotFoundException" if op == Operation::Concatenate => {
                return StoreError::SourceMissing(message);
            }
            "IllegalArgumentException" | "BadRequestException" => {
                return StoreError::InvalidArgument(message);
            }
            _ => {}
        }
    }

    match (op, status) {
        (Operation::Concatenate, StatusCode::NOT_FOUND) => StoreError::SourceMissing(message),
        (Operation::Concatenate, StatusCode::CONFLICT) => StoreError::DestinationConflict(message),
        (_, StatusCode::BAD_REQUEST) => StoreError::InvalidArgument(message),
        _ => StoreError::TransportFailure(message),
    }
}

#[async_trait]
impl StoreClient for WebHdfsStore {
    fn provider_name(&self) -> &'static str {
        "WebHDFS"
    }

    async fn probe(&self, path: &StorePath) -> StoreResult<ItemKind> {
        debug!("Probing {}", path);

        let response = self
            .request(Method::GET, path, "GETFILESTATUS")
            .send()
            .await
            .map_err(|e| StoreError::TransportFailure(format!("probe {path} failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return absent_or_error(response, path).await;
        }
        if !response.status().is_success() {
            return Err(Self::remote_error(response, Operation::Probe, path).await);
        }

        let status: FileStatusResponse = response
            .json()
            .await
            .map_err(|e| StoreError::TransportFailure(format!("parse file status failed: {e}")))?;

        match status.file_status.kind.as_str() {
            "FILE" => Ok(ItemKind::File),
            "DIRECTORY" => Ok(ItemKind::Directory),
            other => Err(StoreError::TransportFailure(format!(
                "unknown item type for {path}: {other}"
            ))),
        }
    }

    async fn delete(&self, path: &StorePath, recursive: bool) -> StoreResult<()> {
        debug!("Deleting {} (recursive: {})", path, recursive);

        let response = self
            .request(Method::DELETE, path, "DELETE")
            .query(&[("recursive", if recursive { "true" } else { "false" })])
            .send()
            .await
            .map_err(|e| StoreError::TransportFailure(format!("delete {path} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response, Operation::Delete, path).await);
        }

        let result: BooleanResponse = response
            .json()
            .await
            .map_err(|e| StoreError::TransportFailure(format!("parse delete response failed: {e}")))?;

        if !result.boolean {
            return Err(StoreError::TransportFailure(format!(
                "store refused to delete {path}"
            )));
        }

        info!("Deleted {}", path);
        Ok(())
    }

    async fn concatenate(
        &self,
        destination: &StorePath,
        sources: &SourcePaths,
    ) -> StoreResult<()> {
        debug!(
            "Concatenating {} sources into {}",
            sources.as_slice().len(),
            destination
        );

        let body = ConcatRequest {
            sources: sources.iter().map(StorePath::as_str).collect(),
        };

        let response = self
            .request(Method::POST, destination, "MSCONCAT")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                StoreError::TransportFailure(format!("concatenate {destination} failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response, Operation::Concatenate, destination).await);
        }

        info!("Concatenated into {}", destination);
        Ok(())
    }
}
