//! Integration tests for the static asset server

#[cfg(feature = "server")]
mod server_tests {
    use gesture_keys::server::{run, ServerConfig};
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::Path;
    use std::time::Duration;

    fn public_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("index.html"), "<h1>gesture-keys</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();
        std::fs::write(dir.path().join("vision_bundle.js.gz"), [0x1f, 0x8b, 0x08, 0x00]).unwrap();
        dir
    }

    async fn start(dir: &Path) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
        let config = ServerConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, dir.to_path_buf());
        let started = run(config).await.expect("Failed to start server");

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(100)).await;
        started
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = public_dir();
        let (addr, shutdown_tx) = start(dir.path()).await;

        let response = reqwest::get(format!("http://{}/health", addr))
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
        assert!(body["version"].as_str().is_some());

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = public_dir();
        let (addr, shutdown_tx) = start(dir.path()).await;

        let response = reqwest::get(format!("http://{}/", addr))
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "<h1>gesture-keys</h1>");

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_plain_asset_has_no_gzip_encoding() {
        let dir = public_dir();
        let (addr, shutdown_tx) = start(dir.path()).await;

        let response = reqwest::get(format!("http://{}/app.js", addr))
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
        assert!(response.headers().get("content-encoding").is_none());
        assert_eq!(response.text().await.unwrap(), "console.log('hi');");

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_gz_asset_headers() {
        let dir = public_dir();
        let (addr, shutdown_tx) = start(dir.path()).await;

        // The client must not try to decode the stub gzip body.
        let client = reqwest::Client::builder()
            .no_gzip()
            .build()
            .unwrap();
        let response = client
            .get(format!("http://{}/vision_bundle.js.gz", addr))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.headers()["content-encoding"], "gzip");
        assert_eq!(response.headers()["content-type"], "application/javascript");
        assert_eq!(
            response.bytes().await.unwrap().as_ref(),
            &[0x1f, 0x8b, 0x08, 0x00]
        );

        let _ = shutdown_tx.send(());
    }

    #[test]
    fn test_shipped_index_has_front_end_hooks() {
        let page = std::fs::read_to_string(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("public/index.html"),
        )
        .expect("public/index.html");
        for id in ["webcam", "outputCanvas", "keyStatus", "testInput"] {
            assert!(page.contains(&format!("id=\"{id}\"")), "missing #{id}");
        }
        assert!(page.contains(r#"<script type="module" src="app.js">"#));
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let dir = public_dir();
        let (addr, shutdown_tx) = start(dir.path()).await;

        let response = reqwest::get(format!("http://{}/nope.js", addr))
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let _ = shutdown_tx.send(());
    }
}
