//! Peerdrop TUI - 文件共享终端界面
//!
//! 对本机 peer 发起共享/下载请求，并展示传输表。
//!
//! # 日志
//!
//! 日志默认显示在 TUI 的 Log 标签页中。
//! 如需输出到文件进行调试，设置 RUST_LOG 环境变量：
//!
//! ```bash
//! RUST_LOG=debug cargo run -p peerdrop-tui 2>> /tmp/peerdrop.log
//! ```

mod app;
mod tui_log;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use peerdrop_core::{AppSettings, PeerClient};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use tui_log::TuiLogLayer;

#[derive(Parser)]
#[command(name = "peerdrop-tui", version, about = "Peerdrop - file sharing TUI")]
struct Cli {
    /// 要共享的文件路径（预填共享表单）
    file: Option<String>,

    /// peer 服务地址（覆盖配置文件）
    #[arg(long)]
    peer_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = AppSettings::load();
    let peer_url = cli.peer_url.unwrap_or(settings.peer_url);

    // 创建 App（获取日志发送器）
    let mut app = App::new(PeerClient::new(peer_url));
    if let Some(path) = cli.file {
        app.set_share_file(path);
    }

    // 初始化日志系统，发送到 TUI 日志面板
    init_logging(app.event_tx.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// 初始化日志系统
///
/// - 总是将日志发送到 TUI 日志面板
/// - 如果设置了 RUST_LOG，同时输出到 stderr（用于调试）
fn init_logging(log_tx: tokio::sync::mpsc::Sender<app::AppEvent>) {
    // 桥接 log crate（peerdrop-core 使用）到 tracing
    let _ = tracing_log::LogTracer::init();

    let tui_layer = TuiLogLayer::new(log_tx);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,peerdrop_core=debug"));

    if std::env::var("RUST_LOG").is_ok() {
        use tracing_subscriber::fmt;

        let stderr_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .with(stderr_layer)
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .try_init();
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        // 使用 poll 避免无限阻塞
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // 模态提示框打开时，任意按键只负责关闭它
            if app.alert.is_some() {
                app.dismiss_alert();
                continue;
            }

            match app.tab {
                // 两个表单标签页：按键进输入缓冲，Enter 提交
                app::Tab::Share | app::Tab::Download => match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::Enter => {
                        if app.tab == app::Tab::Share {
                            app.submit_share();
                        } else {
                            app.submit_download();
                        }
                    }
                    KeyCode::Up | KeyCode::Down => {
                        if app.tab == app::Tab::Download {
                            app.next_download_field();
                        }
                    }
                    KeyCode::Char(c) => {
                        if let Some(buffer) = app.focused_input_mut() {
                            buffer.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        if let Some(buffer) = app.focused_input_mut() {
                            buffer.pop();
                        }
                    }
                    _ => {}
                },
                _ => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::Char('1') => app.tab = app::Tab::Share,
                    KeyCode::Char('2') => app.tab = app::Tab::Download,
                    KeyCode::Char('3') => app.tab = app::Tab::Transfers,
                    KeyCode::Char('4') => app.tab = app::Tab::Log,
                    KeyCode::Char('d') => app.toggle_log_level(),
                    KeyCode::Char('c') => app.clear_logs(),
                    _ => {}
                },
            }
        }

        // 排空异步事件（HTTP 结果、进度 tick、日志）
        app.tick();
    }
}
