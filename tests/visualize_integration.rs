//! Integration tests for the batch visualization flow against a mock
//! backend.

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vizstream::config::Config;
use vizstream::VisualizeClient;

// 1x1 transparent PNG header, enough for format sniffing
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89,
];

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.backend.origin = server.uri();
    config
}

fn write_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sales.csv");
    std::fs::write(&path, b"q,revenue\nq1,10\nq2,20\n").unwrap();
    path
}

/// The full batch flow: visualize, then download only the image entries.
#[tokio::test]
async fn test_visualize_and_download_images() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);

    let response_body = serde_json::json!({
        "success": true,
        "execution_time": 4.2,
        "response_text": "Revenue doubled between quarters.",
        "generated_files": [
            {"name": "revenue.png", "download_url": "/files/revenue.png",
             "file_type": "image", "size_bytes": PNG_BYTES.len()},
            {"name": "summary.csv", "download_url": "/files/summary.csv",
             "file_type": "data", "size_bytes": 64}
        ]
    });

    Mock::given(method("POST"))
        .and(path("/visualize"))
        .and(body_partial_json(serde_json::json!({
            "prompt": "chart the revenue",
            "file_name": "sales.csv",
            "file_type": "text/csv",
            "analysis_type": "comprehensive"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/revenue.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES.to_vec(), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    // The non-image entry must not be fetched.
    Mock::given(method("GET"))
        .and(path("/files/summary.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("q,revenue"))
        .expect(0)
        .mount(&server)
        .await;

    let client = VisualizeClient::new(&config_for(&server)).unwrap();
    let response = client
        .visualize(&input, "chart the revenue", "comprehensive")
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.response_text, "Revenue doubled between quarters.");
    assert_eq!(response.generated_files.len(), 2);

    let out = tempfile::tempdir().unwrap();
    let saved = client
        .download_images(&response.generated_files, out.path())
        .await;

    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].file_name().unwrap(), "revenue.png");
    assert_eq!(std::fs::read(&saved[0]).unwrap(), PNG_BYTES);
}

/// A non-success response is an error, not a silent empty result.
#[tokio::test]
async fn test_visualize_non_success_status_errors() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);

    Mock::given(method("POST"))
        .and(path("/visualize"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = VisualizeClient::new(&config_for(&server)).unwrap();
    let result = client.visualize(&input, "prompt", "basic").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("503"));
}

/// One failed download is skipped; the others still land.
#[tokio::test]
async fn test_failed_download_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/good.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES.to_vec(), "image/png"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let files = vec![
        vizstream::GeneratedFile {
            name: "gone.png".to_string(),
            download_url: "/files/gone.png".to_string(),
            file_type: "image".to_string(),
            size_bytes: 1,
        },
        vizstream::GeneratedFile {
            name: "good.png".to_string(),
            download_url: "/files/good.png".to_string(),
            file_type: "image".to_string(),
            size_bytes: PNG_BYTES.len() as u64,
        },
    ];

    let client = VisualizeClient::new(&config_for(&server)).unwrap();
    let out = tempfile::tempdir().unwrap();
    let saved = client.download_images(&files, out.path()).await;

    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].file_name().unwrap(), "good.png");
}

/// An unreadable input file errors before any request is made.
#[tokio::test]
async fn test_visualize_missing_file_errors() {
    let server = MockServer::start().await;
    let client = VisualizeClient::new(&config_for(&server)).unwrap();
    let result = client
        .visualize(std::path::Path::new("/does/not/exist.csv"), "p", "basic")
        .await;
    assert!(result.is_err());
}
