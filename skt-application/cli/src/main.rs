//! SSH Key Transmitter CLI 应用

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::Level;

use skt_transmitter::{
    resolve_hosts, Credentials, KeyTransmitter, ProxyConfig, TransmitConfig, TransmitOutcome,
};

#[derive(Parser)]
#[command(name = "ssh-key-transmit")]
#[command(about = "SSH Key Transmitter - 向远程主机批量下发 SSH 公钥", long_about = None)]
#[command(version)]
struct Cli {
    /// 认证用户名
    #[arg(short, long)]
    username: String,

    /// 认证密码
    #[arg(short, long)]
    password: String,

    /// 公钥文件路径
    #[arg(short = 'k', long = "pub-key", value_name = "PATH")]
    pub_key: PathBuf,

    /// 目标主机（host 或 host:port 形式，可指定多个）
    #[arg(long = "hosts", value_name = "HOST", num_args = 1..)]
    hosts: Vec<String>,

    /// 主机列表文件路径（内容按逗号/空白分隔）
    #[arg(long, value_name = "PATH")]
    hosts_file: Option<PathBuf>,

    /// SOCKS5 代理主机
    #[arg(long, value_name = "HOST")]
    socks_host: Option<String>,

    /// SOCKS5 代理端口
    #[arg(long, value_name = "PORT")]
    socks_port: Option<u16>,

    /// 日志级别 0-3（0=ERROR 1=WARN 2=INFO 3=DEBUG）
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=3))]
    verbose: u8,
}

/// 详细程度到日志级别的映射
fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .init();

    // 代理主机与端口必须成对出现
    let proxy = match (cli.socks_host, cli.socks_port) {
        (Some(host), Some(port)) => Some(ProxyConfig { host, port }),
        (None, None) => None,
        _ => bail!("--socks-host 与 --socks-port 必须同时提供"),
    };

    let hosts = resolve_hosts(&cli.hosts, cli.hosts_file.as_deref()).context("解析主机列表失败")?;

    let config = TransmitConfig {
        credentials: Credentials {
            username: cli.username,
            password: cli.password,
        },
        pubkey_path: cli.pub_key,
        proxy,
    };

    let transmitter = KeyTransmitter::new(config).context("加载公钥失败")?;
    let report = transmitter.run(&hosts).await;

    // 逐台主机打印结果
    println!();
    for (host, result) in &report.results {
        match result {
            Ok(TransmitOutcome::Added) => {
                println!(
                    "{} {} 公钥已追加",
                    "✓".green().bold(),
                    host.to_string().cyan().bold()
                );
            }
            Ok(TransmitOutcome::AlreadyPresent) => {
                println!(
                    "{} {} 公钥已存在",
                    "✓".green().bold(),
                    host.to_string().cyan().bold()
                );
            }
            Err(err) => {
                println!(
                    "{} {} {}",
                    "✗".red().bold(),
                    host.to_string().cyan().bold(),
                    err.to_string().red()
                );
            }
        }
    }

    if report.all_succeeded() {
        println!(
            "\n{} 全部 {} 台主机处理完成",
            "✓".green().bold(),
            report.results.len()
        );
    } else {
        // 单台主机失败不影响退出码，只有致命配置错误才返回非零
        println!(
            "\n{} {}/{} 台主机失败",
            "✗".red().bold(),
            report.errored_hosts().len(),
            report.results.len()
        );
    }

    Ok(())
}
