//! 集成测试 - peer API 客户端
//!
//! 用 axum 在临时端口上模拟 peer 的两个接口，验证 PeerClient
//! 放到线上的请求形状和对各种响应体的解码。

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use peerdrop_core::PeerClient;

/// 在随机端口启动一个模拟 peer，返回其基地址
async fn spawn_mock_peer(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    format!("http://{}", addr)
}

/// 写一个临时文件用于上传测试
fn temp_upload_file(name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("peerdrop-test-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).expect("write temp file");
    path
}

/// 共享成功：multipart 的 `file` 字段带文件名和内容，响应原样解码
#[tokio::test]
async fn test_share_success() {
    async fn share(mut multipart: Multipart) -> Json<Value> {
        let field = multipart
            .next_field()
            .await
            .expect("read field")
            .expect("one field");
        assert_eq!(field.name(), Some("file"));
        let filename = field.file_name().expect("file name").to_string();
        let bytes = field.bytes().await.expect("field bytes");
        assert_eq!(&bytes[..], b"chunk me");

        Json(json!({
            "success": true,
            "file_id": 42,
            "filename": filename,
        }))
    }

    let base = spawn_mock_peer(Router::new().route("/api/share", post(share))).await;
    let path = temp_upload_file("report.pdf", b"chunk me");

    let resp = PeerClient::new(&base).share(&path).await.expect("share");

    assert!(resp.success);
    assert_eq!(resp.file_id_text(), "42");
    assert_eq!(
        resp.filename.as_deref(),
        path.file_name().map(|n| n.to_str().unwrap())
    );

    let _ = std::fs::remove_file(&path);
}

/// 共享失败：peer 返回 400 + 裸 `{"error": ...}`，客户端照样解析 body
#[tokio::test]
async fn test_share_bare_error_body_with_status() {
    async fn share(_multipart: Multipart) -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No file provided"})),
        )
    }

    let base = spawn_mock_peer(Router::new().route("/api/share", post(share))).await;
    let path = temp_upload_file("empty.bin", b"x");

    let resp = PeerClient::new(&base).share(&path).await.expect("share");

    assert!(!resp.success);
    assert_eq!(resp.error_message(), "No file provided");

    let _ = std::fs::remove_file(&path);
}

/// 下载成功：请求体是 `{"file_id": <int>, "output_path": <string>}`
#[tokio::test]
async fn test_download_success_wire_format() {
    async fn download(Json(payload): Json<Value>) -> Json<Value> {
        // 把收到的请求回显到 message 里，在客户端断言
        Json(json!({
            "success": true,
            "message": format!(
                "file_id={} output_path={}",
                payload["file_id"], payload["output_path"]
            ),
        }))
    }

    let base = spawn_mock_peer(Router::new().route("/api/download", post(download))).await;

    let resp = PeerClient::new(&base)
        .download("7", "/tmp/out.bin")
        .await
        .expect("download");

    assert!(resp.success);
    assert_eq!(
        resp.message.as_deref(),
        Some(r#"file_id=7 output_path="/tmp/out.bin""#)
    );
}

/// 非数字 ID 不在客户端拒绝，线上是 JSON null
#[tokio::test]
async fn test_download_non_numeric_id_sends_null() {
    async fn download(Json(payload): Json<Value>) -> Json<Value> {
        Json(json!({
            "success": true,
            "message": format!("file_id_is_null={}", payload["file_id"].is_null()),
        }))
    }

    let base = spawn_mock_peer(Router::new().route("/api/download", post(download))).await;

    let resp = PeerClient::new(&base)
        .download("abc", "/tmp/out.bin")
        .await
        .expect("download");

    assert_eq!(resp.message.as_deref(), Some("file_id_is_null=true"));
}

/// 下载失败：`{"success": false, "error": ...}`
#[tokio::test]
async fn test_download_failure() {
    async fn download(Json(_payload): Json<Value>) -> (StatusCode, Json<Value>) {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "file not found"})),
        )
    }

    let base = spawn_mock_peer(Router::new().route("/api/download", post(download))).await;

    let resp = PeerClient::new(&base)
        .download("99", "/tmp/out.bin")
        .await
        .expect("download");

    assert!(!resp.success);
    assert_eq!(resp.error_message(), "file not found");
}

/// peer 不可达时是传输错误，不是 panic
#[tokio::test]
async fn test_unreachable_peer_is_http_error() {
    // 端口 1 上没有监听
    let client = PeerClient::new("http://127.0.0.1:1");
    let err = client.download("1", "/tmp/out.bin").await.unwrap_err();
    assert!(matches!(err, peerdrop_core::ApiError::Http(_)));
}
