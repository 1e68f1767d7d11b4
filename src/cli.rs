use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use apimessenger::ApiMessenger;
use apimessenger::config::ConfigLoader;
use apimessenger::utils::{format_inbox, format_json};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API token（优先于配置文件）
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// 接口地址（优先于配置文件）
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// 配置文件路径，默认查找 apimessenger.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 读取收件箱
    Inbox {
        /// 页码，0 表示新消息
        #[arg(long, default_value_t = 0)]
        offset: i64,
        #[arg(long)]
        json: bool,
    },
    /// 读取某个会话的新消息
    Chat {
        author: String,
        #[arg(long)]
        json: bool,
    },
    /// 发送文本消息
    Send {
        chat: String,
        text: String,
        /// 把 chat 当作手机号（自动追加 @c.us）
        #[arg(long)]
        phone: bool,
    },
    /// 发送文件
    SendFile {
        chat: String,
        /// 文件内容（URL 或 base64 data URI）
        body: String,
        #[arg(long)]
        filename: String,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// 查看 webhook 配置
    Webhook,
    /// 下载设备配对二维码
    Qr {
        #[arg(long, short, default_value = "qr.png")]
        output: PathBuf,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => Some(ConfigLoader::load_from_path(path)?),
        None => ConfigLoader::find_and_load(),
    };
    let config = ConfigLoader::build_config(file, cli.token, cli.base_url)?;
    let client = ApiMessenger::with_config(config)?;
    tracing::debug!(base_url = %client.config().base_url, "client ready");

    match cli.command {
        Commands::Inbox { offset, json } => {
            let messages = client.get_inbox(offset).await?;
            print_messages(&messages, json)?;
        }
        Commands::Chat { author, json } => {
            let messages = client.get_chat_messages(&author).await?;
            print_messages(&messages, json)?;
        }
        Commands::Send { chat, text, phone } => {
            if phone {
                let response = client.send_phone_message(&chat, &text).await?;
                println!("{}", format_json(&response.into()));
            } else {
                let status = client.send_message(&chat, &text).await?;
                let line = format!("status: {}", status);
                if status == "OK" {
                    println!("{}", line.green());
                } else {
                    println!("{}", line.yellow());
                }
            }
        }
        Commands::SendFile {
            chat,
            body,
            filename,
            caption,
        } => {
            let response = client.send_file(&chat, &body, &filename, &caption).await?;
            println!("{}", format_json(&response.into()));
        }
        Commands::Webhook => {
            let webhook = client.get_webhook().await?;
            println!("{}", format_json(&webhook.into()));
        }
        Commands::Qr { output } => {
            let image = client.get_qr_code().await?;
            std::fs::write(&output, &image)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} {} ({} bytes)",
                "✓".green(),
                output.display(),
                image.len()
            );
        }
    }

    Ok(())
}

fn print_messages(messages: &[apimessenger::InboxMessage], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
    } else if messages.is_empty() {
        println!("{}", "No messages".dimmed());
    } else {
        println!("{}", format_inbox(messages));
    }
    Ok(())
}
