//! peer HTTP API
//!
//! peer 节点暴露两个操作：
//! - `POST /api/share` — multipart 上传，peer 分块并注册到 tracker
//! - `POST /api/download` — JSON 请求，peer 在后台拉取分块写入目标路径

mod client;
mod types;

pub use client::{ApiError, PeerClient};
pub use types::{DownloadRequest, DownloadResponse, ShareResponse, parse_file_id};
