use lakestore_client::{ErrorKind, StoreClient, StoreError, WebHdfsConfig, WebHdfsStore};
use lakestore_types::{ItemKind, SourcePaths, StorePath};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Config ──────────────────────────────────────────────────────

#[test]
fn config_default() {
    let cfg = WebHdfsConfig::default();
    assert!(cfg.account.is_empty());
    assert_eq!(cfg.endpoint_suffix, "azuredatalakestore.net");
    assert!(cfg.base_url.is_none());
    assert!(cfg.access_token.is_none());
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn config_host_and_base_url() {
    let cfg = WebHdfsConfig {
        account: "contoso".to_string(),
        ..Default::default()
    };
    assert_eq!(cfg.host(), "contoso.azuredatalakestore.net");
    assert_eq!(cfg.api_base_url(), "https://contoso.azuredatalakestore.net");

    let overridden = WebHdfsConfig {
        base_url: Some("http://127.0.0.1:9000/".to_string()),
        ..cfg
    };
    assert_eq!(overridden.api_base_url(), "http://127.0.0.1:9000");
}

#[test]
fn config_validation() {
    assert_eq!(
        WebHdfsConfig::default().validate().unwrap_err().kind(),
        ErrorKind::Config
    );
    let bad_name = WebHdfsConfig {
        account: "con/toso".to_string(),
        ..Default::default()
    };
    assert!(bad_name.validate().is_err());
    let zero_timeout = WebHdfsConfig {
        account: "contoso".to_string(),
        timeout_secs: 0,
        ..Default::default()
    };
    assert!(zero_timeout.validate().is_err());
}

#[test]
fn config_serde_roundtrip() {
    let cfg = WebHdfsConfig {
        account: "contoso".to_string(),
        access_token: Some("token".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: WebHdfsConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.account, "contoso");
    assert_eq!(back.access_token.as_deref(), Some("token"));
}

#[test]
fn new_rejects_invalid_config() {
    assert!(WebHdfsStore::new(WebHdfsConfig::default()).is_err());
}

// ── Wiremock-based integration tests ────────────────────────────

fn mock_store(server: &MockServer) -> WebHdfsStore {
    WebHdfsStore::new(WebHdfsConfig {
        account: "contoso".to_string(),
        base_url: Some(server.uri()),
        access_token: Some("secret".to_string()),
        ..Default::default()
    })
    .unwrap()
}

fn store_path(raw: &str) -> StorePath {
    StorePath::parse(raw).unwrap()
}

fn file_status(kind: &str) -> serde_json::Value {
    serde_json::json!({
        "FileStatus": {
            "type": kind,
            "length": 12,
            "pathSuffix": ""
        }
    })
}

fn remote_exception(exception: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "RemoteException": {
            "exception": exception,
            "message": message,
            "javaClassName": format!("java.io.{exception}")
        }
    })
}

#[tokio::test]
async fn provider_name() {
    let server = MockServer::start().await;
    assert_eq!(mock_store(&server).provider_name(), "WebHDFS");
}

#[tokio::test]
async fn probe_reports_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .and(query_param("op", "GETFILESTATUS"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_status("FILE")))
        .expect(1)
        .mount(&server)
        .await;

    let kind = mock_store(&server).probe(&store_path("/a/out.txt")).await.unwrap();
    assert_eq!(kind, ItemKind::File);
}

#[tokio::test]
async fn probe_reports_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_status("DIRECTORY")))
        .mount(&server)
        .await;

    let kind = mock_store(&server).probe(&store_path("/a")).await.unwrap();
    assert_eq!(kind, ItemKind::Directory);
}

#[tokio::test]
async fn probe_not_found_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/missing.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(remote_exception(
            "FileNotFoundException",
            "File /missing.txt does not exist.",
        )))
        .mount(&server)
        .await;

    let kind = mock_store(&server).probe(&store_path("/missing.txt")).await.unwrap();
    assert_eq!(kind, ItemKind::Absent);
}

#[tokio::test]
async fn file_status_empty_404_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/missing.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let kind = mock_store(&server).probe(&store_path("/missing.txt")).await.unwrap();
    assert_eq!(kind, ItemKind::Absent);
}

#[tokio::test]
async fn file_status_foreign_404_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<html><body>No such route</body></html>"),
        )
        .mount(&server)
        .await;

    let err = mock_store(&server)
        .probe(&store_path("/a/out.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    assert!(err.to_string().contains("unexpected 404"));
}

#[tokio::test]
async fn file_status_404_with_other_exception_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(remote_exception(
            "AccountNotFoundException",
            "account does not exist",
        )))
        .mount(&server)
        .await;

    let err = mock_store(&server)
        .probe(&store_path("/a/out.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn probe_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = mock_store(&server)
        .probe(&store_path("/a/out.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    assert!(err.to_string().contains("unavailable"));
}

#[tokio::test]
async fn probe_unknown_type_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_status("SYMLINK")))
        .mount(&server)
        .await;

    let err = mock_store(&server).probe(&store_path("/a")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn probe_unreachable_store_is_transport_failure() {
    let server = MockServer::builder().start().await;
    let store = mock_store(&server);
    drop(server);

    let err = store.probe(&store_path("/a")).await.unwrap_err();
    assert!(matches!(err, StoreError::TransportFailure(_)));
}

#[tokio::test]
async fn delete_sends_recursive_flag() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .and(query_param("op", "DELETE"))
        .and(query_param("recursive", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"boolean": true})))
        .expect(1)
        .mount(&server)
        .await;

    mock_store(&server)
        .delete(&store_path("/a/out.txt"), false)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_refused_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"boolean": false})))
        .mount(&server)
        .await;

    let err = mock_store(&server)
        .delete(&store_path("/a/out.txt"), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn concatenate_posts_sources_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .and(query_param("op", "MSCONCAT"))
        .and(body_json(serde_json::json!({
            "sources": ["/a/2.txt", "/a/1.txt", "/b/3.txt"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sources = SourcePaths::parse(["/a/2.txt", "/a/1.txt", "/b/3.txt"]).unwrap();
    mock_store(&server)
        .concatenate(&store_path("/a/out.txt"), &sources)
        .await
        .unwrap();
}

#[tokio::test]
async fn concatenate_existing_destination_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(ResponseTemplate::new(403).set_body_json(remote_exception(
            "FileAlreadyExistsException",
            "/a/out.txt already exists",
        )))
        .mount(&server)
        .await;

    let sources = SourcePaths::parse(["/a/1.txt"]).unwrap();
    let err = mock_store(&server)
        .concatenate(&store_path("/a/out.txt"), &sources)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DestinationConflict);
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn concatenate_missing_source_is_source_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(remote_exception(
            "FileNotFoundException",
            "/a/1.txt does not exist",
        )))
        .mount(&server)
        .await;

    let sources = SourcePaths::parse(["/a/1.txt"]).unwrap();
    let err = mock_store(&server)
        .concatenate(&store_path("/a/out.txt"), &sources)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceMissing);
}

#[tokio::test]
async fn concatenate_bad_request_is_invalid_argument() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhdfs/v1/a/out.txt"))
        .respond_with(ResponseTemplate::new(400).set_body_json(remote_exception(
            "IllegalArgumentException",
            "duplicate source",
        )))
        .mount(&server)
        .await;

    let sources = SourcePaths::parse(["/a/1.txt", "/a/1.txt"]).unwrap();
    let err = mock_store(&server)
        .concatenate(&store_path("/a/out.txt"), &sources)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
