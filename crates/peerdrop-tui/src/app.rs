//! 应用状态 —— 传输控制器
//!
//! 所有状态变更都发生在 UI 主循环上：表单提交把 HTTP 调用 spawn
//! 出去，结果通过 mpsc 通道送回来，主循环每帧 `tick()` 一次性
//! 排空通道（await 点之间保持 run-to-completion 语义）。
//!
//! 传输行保存在按生成 ID 索引的内存 store 里，渲染层每帧照表
//! 绘制；进度动画任务带着自己的行 ID，标签重复也互不干扰。

use std::path::PathBuf;
use std::time::Duration;

use peerdrop_core::{DownloadResponse, LogEntry, LogLevel, PeerClient, ShareResponse};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// 进度动画的步进间隔
const PROGRESS_TICK: Duration = Duration::from_millis(500);
/// 每步推进的百分比
const PROGRESS_STEP: u8 = 10;
/// 到达 100% 后进度面板保留的时间
const PANEL_LINGER: Duration = Duration::from_secs(2);

pub const MSG_NO_FILE: &str = "Please select a file to share";
pub const MSG_MISSING_FIELDS: &str = "Please fill in all fields";

pub type TransferId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Share,
    Download,
}

impl TransferKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransferKind::Share => "Share",
            TransferKind::Download => "Download",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    InProgress,
    Completed,
}

impl TransferStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransferStatus::InProgress => "In Progress",
            TransferStatus::Completed => "Completed",
        }
    }
}

/// 一次共享或下载在传输表里的一行
///
/// 行只会追加，进程存活期间不删除。
#[derive(Debug, Clone)]
pub struct TransferRow {
    pub id: TransferId,
    pub label: String,
    pub kind: TransferKind,
    /// 0..=100
    pub progress: u8,
    pub status: TransferStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Share,
    Download,
    Transfers,
    Log,
}

/// 下载表单中的焦点字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadField {
    FileId,
    OutputPath,
}

/// 异步任务送回主循环的事件
#[derive(Debug)]
pub enum AppEvent {
    ShareFinished(Result<ShareResponse, String>),
    DownloadFinished {
        output_path: String,
        result: Result<DownloadResponse, String>,
    },
    ProgressTick {
        id: TransferId,
        percent: u8,
    },
    HideDownloadPanel,
    LogMessage {
        level: LogLevel,
        message: String,
    },
}

pub struct App {
    pub tab: Tab,
    /// 共享表单：待共享文件的路径
    pub share_file_input: String,
    /// 下载表单：文件 ID
    pub file_id_input: String,
    /// 下载表单：输出路径
    pub output_path_input: String,
    pub download_field: DownloadField,

    /// 传输行 store，按 `TransferRow::id` 索引
    pub transfers: Vec<TransferRow>,
    next_id: TransferId,

    /// 共享结果面板：最近一次共享返回的文件 ID，None = 隐藏
    pub share_result: Option<String>,
    /// 下载进度面板：当前百分比，None = 隐藏
    pub panel_progress: Option<u8>,

    /// 模态提示框（对应页面版的 alert()），任意按键关闭
    pub alert: Option<String>,
    pub status_message: String,

    pub logs: Vec<LogEntry>,
    pub log_level: LogLevel,

    client: PeerClient,
    pub event_tx: mpsc::Sender<AppEvent>,
    event_rx: mpsc::Receiver<AppEvent>,
}

impl App {
    pub fn new(client: PeerClient) -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);
        Self {
            tab: Tab::Share,
            share_file_input: String::new(),
            file_id_input: String::new(),
            output_path_input: String::new(),
            download_field: DownloadField::FileId,
            transfers: Vec::new(),
            next_id: 0,
            share_result: None,
            panel_progress: None,
            alert: None,
            status_message: format!("Peer: {}", client.base_url()),
            logs: Vec::new(),
            log_level: LogLevel::Info,
            client,
            event_tx,
            event_rx,
        }
    }

    /// 预填共享表单（命令行传入的文件路径）
    pub fn set_share_file(&mut self, path: String) {
        self.share_file_input = path;
    }

    pub fn next_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Share => Tab::Download,
            Tab::Download => Tab::Transfers,
            Tab::Transfers => Tab::Log,
            Tab::Log => Tab::Share,
        };
    }

    pub fn next_download_field(&mut self) {
        self.download_field = match self.download_field {
            DownloadField::FileId => DownloadField::OutputPath,
            DownloadField::OutputPath => DownloadField::FileId,
        };
    }

    /// 当前焦点所在的输入缓冲
    pub fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.tab {
            Tab::Share => Some(&mut self.share_file_input),
            Tab::Download => Some(match self.download_field {
                DownloadField::FileId => &mut self.file_id_input,
                DownloadField::OutputPath => &mut self.output_path_input,
            }),
            _ => None,
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn add_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogEntry::new(level, message));
    }

    pub fn toggle_log_level(&mut self) {
        self.log_level = match self.log_level {
            LogLevel::Debug => LogLevel::Info,
            _ => LogLevel::Debug,
        };
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    // ---- 表单提交 ----

    /// 共享表单的前置检查：必须选择了文件
    pub fn validate_share(&self) -> Result<(), &'static str> {
        if self.share_file_input.trim().is_empty() {
            return Err(MSG_NO_FILE);
        }
        Ok(())
    }

    /// 下载表单的前置检查：两个字段都必须非空。
    /// 文件 ID 是否是数字不在这里检查，非数字输入原样交给客户端。
    pub fn validate_download(&self) -> Result<(), &'static str> {
        if self.file_id_input.trim().is_empty() || self.output_path_input.trim().is_empty() {
            return Err(MSG_MISSING_FIELDS);
        }
        Ok(())
    }

    /// 提交共享表单
    ///
    /// 校验失败弹提示、不发请求；否则把 HTTP 调用 spawn 出去，
    /// 结果以 [`AppEvent::ShareFinished`] 送回。
    pub fn submit_share(&mut self) {
        if let Err(msg) = self.validate_share() {
            debug!("share rejected, file input: {:?}", self.share_file_input);
            self.alert = Some(msg.to_string());
            return;
        }

        let path = PathBuf::from(self.share_file_input.trim());
        self.status_message = format!("Sharing {}...", path.display());
        info!("sharing file: {}", path.display());

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client.share(&path).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ShareFinished(result)).await;
        });
    }

    /// 提交下载表单
    pub fn submit_download(&mut self) {
        if let Err(msg) = self.validate_download() {
            debug!(
                "download rejected, file_id: {:?}, output_path: {:?}",
                self.file_id_input, self.output_path_input
            );
            self.alert = Some(msg.to_string());
            return;
        }

        let file_id = self.file_id_input.trim().to_string();
        let output_path = self.output_path_input.trim().to_string();
        self.status_message = format!("Requesting download of file {}...", file_id);
        info!("requesting download: file_id={} -> {}", file_id, output_path);

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client
                .download(&file_id, &output_path)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(AppEvent::DownloadFinished {
                    output_path,
                    result,
                })
                .await;
        });
    }

    // ---- 事件处理 ----

    /// 每帧调用：排空事件通道
    pub fn tick(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ShareFinished(result) => self.on_share_finished(result),
            AppEvent::DownloadFinished {
                output_path,
                result,
            } => self.on_download_finished(output_path, result),
            AppEvent::ProgressTick { id, percent } => self.apply_progress_tick(id, percent),
            AppEvent::HideDownloadPanel => {
                // 只隐藏面板，表里的行保留
                self.panel_progress = None;
            }
            AppEvent::LogMessage { level, message } => self.add_log(level, message),
        }
    }

    fn on_share_finished(&mut self, result: Result<ShareResponse, String>) {
        match result {
            Ok(resp) if resp.success => {
                let file_id = resp.file_id_text();
                let filename = resp.filename.clone().unwrap_or_default();
                info!("file shared, id: {}", file_id);
                self.share_result = Some(file_id);
                self.push_row(filename, TransferKind::Share, 100, TransferStatus::Completed);
                self.status_message = "File shared".to_string();
            }
            Ok(resp) => {
                self.alert = Some(format!("Error: {}", resp.error_message()));
            }
            Err(msg) => {
                self.alert = Some(format!("Error sharing file: {}", msg));
            }
        }
    }

    fn on_download_finished(&mut self, output_path: String, result: Result<DownloadResponse, String>) {
        match result {
            Ok(resp) if resp.success => {
                info!("download started: {}", output_path);
                self.panel_progress = Some(0);
                let id = self.push_row(
                    output_path,
                    TransferKind::Download,
                    0,
                    TransferStatus::InProgress,
                );
                self.status_message = "Download started".to_string();
                self.spawn_animator(id);
            }
            Ok(resp) => {
                self.alert = Some(format!("Error: {}", resp.error_message()));
            }
            Err(msg) => {
                self.alert = Some(format!("Error downloading file: {}", msg));
            }
        }
    }

    /// 追加一行到传输表，返回分配的 ID
    fn push_row(
        &mut self,
        label: String,
        kind: TransferKind,
        progress: u8,
        status: TransferStatus,
    ) -> TransferId {
        let id = self.next_id;
        self.next_id += 1;
        self.transfers.push(TransferRow {
            id,
            label,
            kind,
            progress,
            status,
        });
        id
    }

    /// 应用一次进度 tick
    ///
    /// 面板无条件更新（并发下载时最后一个 tick 生效）；目标行按
    /// ID 查找，到 100% 时置为 Completed。
    pub fn apply_progress_tick(&mut self, id: TransferId, percent: u8) {
        self.panel_progress = Some(percent);
        if let Some(row) = self.transfers.iter_mut().find(|r| r.id == id) {
            row.progress = percent;
            if percent >= 100 {
                row.status = TransferStatus::Completed;
            }
        }
    }

    /// 启动模拟进度动画
    ///
    /// peer 不提供进度通道，下载进度是纯客户端的定时递增：每
    /// 500ms +10 直到 100，再停留 2s 后隐藏面板。任务发射后
    /// 不管（fire-and-forget），没有取消钩子。
    fn spawn_animator(&self, id: TransferId) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PROGRESS_TICK);
            // interval 的第一次 tick 立即返回
            ticker.tick().await;

            let mut percent: u8 = 0;
            while percent < 100 {
                ticker.tick().await;
                percent += PROGRESS_STEP;
                if tx.send(AppEvent::ProgressTick { id, percent }).await.is_err() {
                    return;
                }
            }

            tokio::time::sleep(PANEL_LINGER).await;
            let _ = tx.send(AppEvent::HideDownloadPanel).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_app() -> App {
        App::new(PeerClient::new("http://127.0.0.1:1"))
    }

    fn share_ok(file_id: serde_json::Value, filename: &str) -> ShareResponse {
        serde_json::from_value(json!({
            "success": true,
            "file_id": file_id,
            "filename": filename,
        }))
        .unwrap()
    }

    #[test]
    fn test_share_validation_message() {
        let app = test_app();
        assert_eq!(app.validate_share(), Err("Please select a file to share"));
    }

    #[test]
    fn test_download_validation_message() {
        let mut app = test_app();
        assert_eq!(app.validate_download(), Err("Please fill in all fields"));

        // 只填一个字段仍然拒绝
        app.file_id_input = "7".to_string();
        assert_eq!(app.validate_download(), Err("Please fill in all fields"));

        app.output_path_input = "/tmp/out.bin".to_string();
        assert!(app.validate_download().is_ok());
    }

    #[test]
    fn test_submit_share_empty_input_alerts_without_row() {
        let mut app = test_app();
        app.submit_share();

        assert_eq!(app.alert.as_deref(), Some("Please select a file to share"));
        assert!(app.transfers.is_empty());
        assert!(app.share_result.is_none());
    }

    #[test]
    fn test_submit_download_missing_fields_alerts_without_row() {
        let mut app = test_app();
        app.file_id_input = "7".to_string();
        app.submit_download();

        assert_eq!(app.alert.as_deref(), Some("Please fill in all fields"));
        assert!(app.transfers.is_empty());
        assert!(app.panel_progress.is_none());
    }

    #[test]
    fn test_share_success_appends_completed_row_and_shows_id() {
        let mut app = test_app();
        app.apply_event(AppEvent::ShareFinished(Ok(share_ok(
            json!(42),
            "report.pdf",
        ))));

        assert_eq!(app.share_result.as_deref(), Some("42"));
        assert_eq!(app.transfers.len(), 1);
        let row = &app.transfers[0];
        assert_eq!(row.label, "report.pdf");
        assert_eq!(row.kind, TransferKind::Share);
        assert_eq!(row.progress, 100);
        assert_eq!(row.status, TransferStatus::Completed);
    }

    #[test]
    fn test_share_application_error_alerts_without_row() {
        let mut app = test_app();
        let resp: ShareResponse =
            serde_json::from_value(json!({"success": false, "error": "file not found"})).unwrap();
        app.apply_event(AppEvent::ShareFinished(Ok(resp)));

        assert_eq!(app.alert.as_deref(), Some("Error: file not found"));
        assert!(app.transfers.is_empty());
        assert!(app.share_result.is_none());
    }

    #[test]
    fn test_share_transport_error_alert_prefix() {
        let mut app = test_app();
        app.apply_event(AppEvent::ShareFinished(Err("connection refused".to_string())));

        assert_eq!(
            app.alert.as_deref(),
            Some("Error sharing file: connection refused")
        );
        assert!(app.transfers.is_empty());
    }

    #[tokio::test]
    async fn test_download_success_appends_in_progress_row_and_panel() {
        let mut app = test_app();
        let resp: DownloadResponse = serde_json::from_value(json!({"success": true})).unwrap();
        app.apply_event(AppEvent::DownloadFinished {
            output_path: "/tmp/out.bin".to_string(),
            result: Ok(resp),
        });

        assert_eq!(app.panel_progress, Some(0));
        assert_eq!(app.transfers.len(), 1);
        let row = &app.transfers[0];
        assert_eq!(row.label, "/tmp/out.bin");
        assert_eq!(row.kind, TransferKind::Download);
        assert_eq!(row.progress, 0);
        assert_eq!(row.status, TransferStatus::InProgress);
    }

    #[test]
    fn test_download_failure_alerts_without_row() {
        let mut app = test_app();
        let resp: DownloadResponse =
            serde_json::from_value(json!({"success": false, "error": "file not found"})).unwrap();
        app.apply_event(AppEvent::DownloadFinished {
            output_path: "/tmp/out.bin".to_string(),
            result: Ok(resp),
        });

        assert_eq!(app.alert.as_deref(), Some("Error: file not found"));
        assert!(app.transfers.is_empty());
        assert!(app.panel_progress.is_none());
    }

    #[test]
    fn test_download_transport_error_alert_prefix() {
        let mut app = test_app();
        app.apply_event(AppEvent::DownloadFinished {
            output_path: "/tmp/out.bin".to_string(),
            result: Err("connection refused".to_string()),
        });

        assert_eq!(
            app.alert.as_deref(),
            Some("Error downloading file: connection refused")
        );
    }

    #[test]
    fn test_progress_ticks_reach_completed_in_ten_steps() {
        let mut app = test_app();
        let id = app.push_row(
            "/tmp/out.bin".to_string(),
            TransferKind::Download,
            0,
            TransferStatus::InProgress,
        );
        app.panel_progress = Some(0);

        for step in 1..=10u8 {
            app.apply_progress_tick(id, step * 10);
            let row = &app.transfers[0];
            assert_eq!(row.progress, step * 10);
            assert_eq!(app.panel_progress, Some(step * 10));
            if step < 10 {
                assert_eq!(row.status, TransferStatus::InProgress);
            }
        }

        assert_eq!(app.transfers[0].status, TransferStatus::Completed);

        // 面板隐藏后行保留
        app.apply_event(AppEvent::HideDownloadPanel);
        assert!(app.panel_progress.is_none());
        assert_eq!(app.transfers.len(), 1);
        assert_eq!(app.transfers[0].status, TransferStatus::Completed);
    }

    #[test]
    fn test_duplicate_labels_do_not_alias() {
        let mut app = test_app();
        let first = app.push_row(
            "/tmp/out.bin".to_string(),
            TransferKind::Download,
            0,
            TransferStatus::InProgress,
        );
        let second = app.push_row(
            "/tmp/out.bin".to_string(),
            TransferKind::Download,
            0,
            TransferStatus::InProgress,
        );
        assert_ne!(first, second);

        // 只推进第二行，第一行不动
        app.apply_progress_tick(second, 50);
        assert_eq!(app.transfers[0].progress, 0);
        assert_eq!(app.transfers[1].progress, 50);
    }

    #[test]
    fn test_controller_recovers_after_error() {
        let mut app = test_app();
        app.submit_share();
        assert!(app.alert.is_some());
        app.dismiss_alert();
        assert!(app.alert.is_none());

        // 出错后控制器照常可用
        app.apply_event(AppEvent::ShareFinished(Ok(share_ok(json!(1), "a.txt"))));
        assert_eq!(app.transfers.len(), 1);
    }
}
