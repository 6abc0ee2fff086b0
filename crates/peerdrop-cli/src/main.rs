//! Peerdrop CLI
//!
//! 一次性命令行客户端，对 peer 发起和 TUI 相同的两个 API 调用。

use anyhow::Result;
use clap::{Parser, Subcommand};
use peerdrop_core::{AppSettings, PeerClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peerdrop", version, about = "Peerdrop - file sharing client")]
struct Cli {
    /// peer 服务地址（覆盖配置文件）
    #[arg(long)]
    peer_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 共享文件（peer 分块并注册到 tracker）
    Share {
        /// 要共享的文件路径
        file: PathBuf,
    },
    /// 请求下载（peer 在后台拉取分块）
    Download {
        /// 文件 ID
        file_id: String,
        /// 输出路径（默认: 下载目录/file_<ID>）
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // tracing-subscriber 默认捕获 log facade（peerdrop-core 使用）
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .try_init();

    let cli = Cli::parse();

    let settings = AppSettings::load();
    let peer_url = cli.peer_url.unwrap_or_else(|| settings.peer_url.clone());
    let client = PeerClient::new(peer_url);

    match cli.command {
        Commands::Share { file } => {
            println!("📤 Sharing {}", file.display());
            let resp = client.share(&file).await?;
            if resp.success {
                println!("✅ File shared, ID: {}", resp.file_id_text());
            } else {
                eprintln!("❌ {}", resp.error_message());
                std::process::exit(1);
            }
        }
        Commands::Download { file_id, output } => {
            let output = output.unwrap_or_else(|| {
                settings
                    .download_dir
                    .join(format!("file_{}", file_id))
                    .to_string_lossy()
                    .into_owned()
            });
            println!("📥 Requesting download of file {} -> {}", file_id, output);
            let resp = client.download(&file_id, &output).await?;
            if resp.success {
                // peer 在后台写文件，这里只确认下载已开始
                println!("✅ {}", resp.message.as_deref().unwrap_or("Download started"));
            } else {
                eprintln!("❌ {}", resp.error_message());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
