//! Upload tests against a mock Nexus server

use std::path::{Path, PathBuf};

use helmpush_core::{LoadedChart, PackagedChart};
use helmpush_repo::{Credentials, Destination, NexusClient, RepoError, Result, UploadOutcome};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the blocking client off the async runtime
async fn upload(
    destination: String,
    credentials: Credentials,
    artifact: PathBuf,
    force: bool,
) -> Result<UploadOutcome> {
    tokio::task::spawn_blocking(move || {
        let destination = Destination::parse(&destination)?;
        NexusClient::new(credentials)?.upload(&destination, &artifact, force)
    })
    .await
    .expect("upload task panicked")
}

fn write_artifact(dir: &Path) -> PathBuf {
    let artifact = dir.join("mychart-0.1.0.tgz");
    std::fs::write(&artifact, b"chart-bytes").unwrap();
    artifact
}

fn repository_url(server: &MockServer) -> String {
    format!("{}/repository/helm-host/", server.uri())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/service/rest/v1/components"))
        .and(query_param("repository", "helm-host"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome, UploadOutcome::Success { status: 201 });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_no_content_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/service/rest/v1/components"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        true,
    )
    .await
    .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.status(), 204);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_multipart_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("multipart content type");

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(&format!("--{}", boundary)));
    assert!(body.contains("name=\"helm.asset\""));
    assert!(body.contains("filename=\"mychart-0.1.0.tgz\""));
    assert!(body.contains("chart-bytes"));
    assert_eq!(body.matches("Content-Disposition").count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_large_artifact_is_streamed_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let artifact = temp.path().join("big-1.0.0.tgz");
    let data: Vec<u8> = (0..512 * 1024).map(|i| (i % 251) as u8).collect();
    std::fs::write(&artifact, &data).unwrap();

    upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        artifact,
        true,
    )
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = &requests[0].body;
    let start = body
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("part headers")
        + 4;
    assert_eq!(&body[start..start + data.len()], data.as_slice());
    assert_eq!(&body[start + data.len()..start + data.len() + 4], b"\r\n--");

    // Length is known up front, so the body is not chunked
    let content_length: usize = requests[0]
        .headers
        .get("content-length")
        .expect("content-length header")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(content_length, body.len());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_force_adds_query_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("repository", "helm-host"))
        .and(query_param("force", ""))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        true,
    )
    .await
    .unwrap();

    assert!(outcome.is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_conflict_without_force() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param_is_missing("force"))
        .respond_with(ResponseTemplate::new(409).set_body_string("version already exists"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    assert_eq!(
        outcome,
        UploadOutcome::Failure {
            status: 409,
            body: "version already exists".to_string(),
        }
    );

    let err = outcome.into_result().unwrap_err();
    assert!(matches!(err, RepoError::RemoteRejected { status: 409, .. }));
    assert_eq!(err.to_string(), "409: version already exists");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_body_is_kept() {
    let server = MockServer::start().await;
    let body = "{\"message\": \"Repository does not allow updating assets: helm-host\"}";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    let message = outcome.to_string();
    assert!(message.starts_with("400: "));
    assert!(message.ends_with(body));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_ok_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::default(),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.to_string(), "200: ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirect_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "https://elsewhere.example.com/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::new("user", "pass"),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.status(), 302);
    assert!(!outcome.is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_credentials_still_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Basic Og=="))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let outcome = upload(
        repository_url(&server),
        Credentials::default(),
        write_artifact(temp.path()),
        false,
    )
    .await
    .unwrap();

    assert!(outcome.is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_artifact_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let result = upload(
        repository_url(&server),
        Credentials::default(),
        temp.path().join("missing-0.1.0.tgz"),
        false,
    )
    .await;

    assert!(matches!(result, Err(RepoError::ArtifactReadError { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_destination_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let result = upload(
        format!("{}/", server.uri()),
        Credentials::default(),
        write_artifact(temp.path()),
        false,
    )
    .await;

    assert!(matches!(result, Err(RepoError::MalformedDestination { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused() {
    // Grab a free port and release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let temp = TempDir::new().unwrap();
    let result = upload(
        format!("http://127.0.0.1:{}/repository/helm-host/", port),
        Credentials::default(),
        write_artifact(temp.path()),
        false,
    )
    .await;

    assert!(matches!(result, Err(RepoError::NetworkError { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_archive_deleted_before_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let chart_dir = TempDir::new().unwrap();
    std::fs::write(
        chart_dir.path().join("Chart.yaml"),
        "apiVersion: v2\nname: mychart\nversion: 0.1.0\n",
    )
    .unwrap();
    let chart = LoadedChart::load(chart_dir.path()).unwrap();

    let packaged = PackagedChart::create(&chart).unwrap();
    let scratch = packaged.scratch_dir().to_path_buf();
    std::fs::remove_file(packaged.path()).unwrap();

    let result = upload(
        repository_url(&server),
        Credentials::default(),
        packaged.path().to_path_buf(),
        false,
    )
    .await;
    assert!(matches!(result, Err(RepoError::ArtifactReadError { .. })));

    drop(packaged);
    assert!(!scratch.exists());
}
