//! Header and favicon probes against a local mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use sitekit_toolbox::{NO_FAVICON, NO_MANIFEST, ToolboxError, ToolboxOptions, ToolboxService};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn toolbox() -> ToolboxService {
    ToolboxService::new(ToolboxOptions::default()).unwrap()
}

fn toolbox_with_timeout(secs: u64) -> ToolboxService {
    ToolboxService::new(ToolboxOptions {
        http_timeout: Duration::from_secs(secs),
        ..ToolboxOptions::default()
    })
    .unwrap()
}

// ==================== header probe ====================

#[tokio::test]
async fn head_forbidden_falls_back_to_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-handler", "get")
                .set_body_string("x".repeat(64 * 1024)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = toolbox().header_check(&server.uri()).await.unwrap();
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.status_message, "OK");
    assert_eq!(result.headers.get("x-handler").map(String::as_str), Some("get"));
    assert_eq!(result.url, server.uri());
    assert!(result.errors.is_empty());
}

/// Serves HEAD with 405 and GET with headers for a 100 MiB body that never
/// arrives.
async fn stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if buf[..n].starts_with(b"HEAD") {
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 405 Method Not Allowed\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                        )
                        .await;
                } else {
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-length: 104857600\r\nx-handler: stalled\r\n\r\n",
                        )
                        .await;
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
            });
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn get_fallback_returns_without_reading_body() {
    let url = stalled_body_server().await;
    let result = tokio::time::timeout(Duration::from_secs(3), toolbox().header_check(&url))
        .await
        .expect("header check waited for the response body")
        .unwrap();
    assert_eq!(result.status_code, Some(200));
    assert_eq!(
        result.headers.get("x-handler").map(String::as_str),
        Some("stalled")
    );
    assert_eq!(result.headers.get("content-length").map(String::as_str), Some("104857600"));
}

#[tokio::test]
async fn head_success_does_not_issue_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = toolbox().header_check(&server.uri()).await.unwrap();
    assert_eq!(result.status_code, Some(204));
    assert_eq!(result.status_message, "No Content");
}

#[tokio::test]
async fn redirects_report_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = toolbox()
        .header_check(&format!("{}/old", server.uri()))
        .await
        .unwrap();
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.url, format!("{}/new", server.uri()));
}

#[tokio::test]
async fn unknown_status_and_repeated_headers() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(299).append_header("x-multi", "a").append_header("x-multi", "b"))
        .mount(&server)
        .await;

    let result = toolbox().header_check(&server.uri()).await.unwrap();
    assert_eq!(result.status_code, Some(299));
    assert_eq!(result.status_message, "Unknown Status");
    assert_eq!(result.headers.get("x-multi").map(String::as_str), Some("a, b"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = toolbox_with_timeout(1)
        .header_check(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolboxError::Timeout(_)));
    assert_eq!(err.to_string(), "Request timed out after 1 seconds.");
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let err = toolbox()
        .header_check("http://127.0.0.1:1")
        .await
        .unwrap_err();
    match err {
        ToolboxError::NetworkError(msg) => {
            assert!(msg.starts_with("Failed to connect or resolve URL:"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ==================== favicon probe ====================

#[tokio::test]
async fn favicon_and_linked_manifest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head>
                <link rel="icon" href="img/favicon.png">
                <link rel="manifest" href="/app.webmanifest">
            </head><body></body></html>"#,
        ))
        .mount(&server)
        .await;

    let url = format!("{}/blog/", server.uri());
    let result = toolbox().favicon_check(&url).await.unwrap();
    assert_eq!(result.url, url);
    assert!(result.has_favicon);
    assert_eq!(
        result.favicon.as_deref(),
        Some(format!("{}/blog/img/favicon.png", server.uri()).as_str())
    );
    assert!(result.has_manifest);
    assert_eq!(
        result.manifest.as_deref(),
        Some(format!("{}/app.webmanifest", server.uri()).as_str())
    );
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn manifest_found_at_well_known_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<link rel="shortcut icon" href="/favicon.ico">"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/site.webmanifest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = toolbox().favicon_check(&server.uri()).await.unwrap();
    assert!(result.has_favicon);
    assert_eq!(
        result.manifest.as_deref(),
        Some(format!("{}/site.webmanifest", server.uri()).as_str())
    );
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn missing_favicon_and_manifest_are_informational() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>plain page</p>"))
        .mount(&server)
        .await;

    let result = toolbox().favicon_check(&server.uri()).await.unwrap();
    assert!(!result.has_favicon);
    assert!(!result.has_manifest);
    assert_eq!(result.favicon, None);
    assert_eq!(result.manifest, None);
    assert_eq!(result.errors, vec![NO_FAVICON, NO_MANIFEST]);
}

#[tokio::test]
async fn scheme_less_url_is_fetched_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let bare = server.uri().trim_start_matches("http://").to_string();
    let result = toolbox().favicon_check(&bare).await.unwrap();
    assert_eq!(result.url, format!("http://{bare}"));
}

#[tokio::test]
async fn error_status_fails_the_favicon_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = toolbox().favicon_check(&server.uri()).await.unwrap_err();
    match err {
        ToolboxError::NetworkError(msg) => {
            assert!(msg.starts_with("Could not fetch content from the URL:"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
