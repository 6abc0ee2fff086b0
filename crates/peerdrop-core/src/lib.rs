//! Peerdrop Core Library
//!
//! chunk-tracker 文件共享网络的客户端核心库。peer 节点负责分块、
//! 注册与实际传输；本库只封装 peer 暴露的两个 HTTP 操作以及
//! 各 UI 共用的配置和日志模型。
//!
//! # 模块
//!
//! - **api**: `/api/share` 与 `/api/download` 的请求/响应类型和 HTTP 客户端
//! - **config**: 应用设置（peer 地址、下载目录）的 TOML 持久化
//! - **logging**: 跨 UI 的日志级别与条目定义
//!
//! # 使用示例
//!
//! ```ignore
//! use peerdrop_core::PeerClient;
//!
//! let client = PeerClient::new("http://127.0.0.1:8000");
//!
//! // 共享文件：peer 负责分块并在 tracker 注册
//! let resp = client.share(Path::new("report.pdf")).await?;
//! println!("file id: {}", resp.file_id_text());
//!
//! // 请求下载：peer 在后台拉取分块并写入 output_path
//! let resp = client.download("42", "/tmp/report.pdf").await?;
//! ```

pub mod api;
pub mod config;
pub mod logging;

// API re-exports
pub use api::{
    ApiError, DownloadRequest, DownloadResponse, PeerClient, ShareResponse, parse_file_id,
};

// Config re-exports
pub use config::{AppSettings, DEFAULT_PEER_URL};

// Logging re-exports
pub use logging::{LogEntry, LogLevel};
