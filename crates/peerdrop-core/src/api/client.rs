//! peer HTTP 客户端
//!
//! 对 peer 的两个 API 的薄封装。与旧版页面一致的两个行为刻意保留：
//!
//! - 不检查 HTTP 状态码，一律按 JSON 解析响应体（peer 的错误响应
//!   带 4xx/5xx，但错误信息在 body 里）
//! - 不设置请求超时，挂起的请求就一直等

use log::debug;
use std::path::Path;

use crate::api::types::{DownloadRequest, DownloadResponse, ShareResponse};

/// 客户端错误
///
/// 传输失败和响应体解码失败都落在 [`ApiError::Http`]；
/// 调用方只需要底层错误文本，展示时自行加操作前缀。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 读取待共享文件失败
    #[error("{0}")]
    File(#[from] std::io::Error),
    /// 传输或响应解码失败
    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// peer API 客户端
#[derive(Debug, Clone)]
pub struct PeerClient {
    base_url: String,
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 共享文件：`POST /api/share`，multipart 字段 `file`
    ///
    /// 文件整体读入内存后上传，MIME 类型按扩展名猜测。
    pub async fn share(&self, path: &Path) -> Result<ShareResponse, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        debug!(
            "POST {}/api/share file={} size={} mime={}",
            self.base_url,
            file_name,
            bytes.len(),
            mime
        );

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/share", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// 请求下载：`POST /api/download`，JSON `{file_id, output_path}`
    ///
    /// peer 在后台拉取分块并写入 `output_path`，响应只表示下载是否
    /// 已开始。`raw_file_id` 按 parseInt 语义解析，见
    /// [`crate::api::parse_file_id`]。
    pub async fn download(
        &self,
        raw_file_id: &str,
        output_path: &str,
    ) -> Result<DownloadResponse, ApiError> {
        let request = DownloadRequest::new(raw_file_id, output_path);

        debug!(
            "POST {}/api/download file_id={} output_path={}",
            self.base_url, request.file_id, request.output_path
        );

        let response = self
            .http
            .post(format!("{}/api/download", self.base_url))
            .json(&request)
            .send()
            .await?;

        Ok(response.json().await?)
    }
}
