use axum::body::Body;
use axum::http::{Request, StatusCode};
use swingalyze_control::{bind_with_retry, ControlError, WebServer, WebServerConfig};
use tower::ServiceExt;

fn static_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Swingalyze</h1>").unwrap();
    std::fs::create_dir(dir.path().join("js")).unwrap();
    std::fs::write(dir.path().join("js/app.js"), "console.log('swing');").unwrap();
    dir
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn app_for(root: &std::path::Path) -> axum::Router {
    WebServer::new(WebServerConfig::default().with_root(root.to_path_buf())).app()
}

#[tokio::test]
async fn test_healthz_reports_ok() {
    let root = static_root();
    let (status, body) = get(app_for(root.path()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"ok":true}"#);
}

#[tokio::test]
async fn test_root_serves_index() {
    let root = static_root();
    let (status, body) = get(app_for(root.path()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Swingalyze"));
}

#[tokio::test]
async fn test_static_file_and_missing_path() {
    let root = static_root();
    let (status, body) = get(app_for(root.path()), "/js/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("swing"));

    let (status, _) = get(app_for(root.path()), "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_healthz_served_without_static_root() {
    let (status, _) = get(app_for(std::path::Path::new("/nonexistent/root")), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bind_skips_port_in_use() {
    // Find a port whose successor is free, then occupy it
    let (blocker, port) = loop {
        let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = blocker.local_addr().unwrap().port();
        if port < u16::MAX && std::net::TcpListener::bind(("127.0.0.1", port + 1)).is_ok() {
            break (blocker, port);
        }
    };

    let listener = bind_with_retry("127.0.0.1", port).await.unwrap();
    assert_eq!(listener.local_addr().unwrap().port(), port + 1);
    drop(blocker);
}

#[tokio::test]
async fn test_bind_other_error_is_fatal() {
    let err = bind_with_retry("host.invalid", 3000).await.unwrap_err();
    assert!(matches!(err, ControlError::Bind { .. }));
}

#[tokio::test]
async fn test_served_over_tcp() {
    let root = static_root();
    let server = WebServer::new(WebServerConfig::default().with_root(root.path().to_path_buf()));
    let listener = bind_with_retry("127.0.0.1", 0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(server.serve(listener));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with(r#"{"ok":true}"#));

    handle.abort();
}
