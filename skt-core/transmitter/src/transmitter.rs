//! 公钥传输器
//!
//! 按输入顺序逐台主机建立 SSH 会话，把本地公钥追加到远程
//! `~/.ssh/authorized_keys`。单台主机失败不中断批量处理。

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::authorized_keys;
use crate::client::SshClient;
use crate::config::{expand_path, TransmitConfig};
use crate::error::{Result, TransmitError};
use crate::hosts::HostEntry;

/// 远程 SSH 目录
const SSH_DIR: &str = "~/.ssh";
/// 远程 authorized_keys 文件
const AUTH_KEYS_FILE: &str = "~/.ssh/authorized_keys";

/// 单台主机的传输结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitOutcome {
    /// 公钥已追加
    Added,
    /// 公钥已存在，未做修改
    AlreadyPresent,
}

/// 整次运行的结果汇总
#[derive(Debug, Default)]
pub struct TransmitReport {
    /// 每台主机的处理结果，保持输入顺序
    pub results: Vec<(HostEntry, Result<TransmitOutcome>)>,
}

impl TransmitReport {
    /// 处理失败的主机列表
    pub fn errored_hosts(&self) -> Vec<&HostEntry> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(host, _)| host)
            .collect()
    }

    /// 是否所有主机都处理成功
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }
}

/// 公钥传输器
#[derive(Debug)]
pub struct KeyTransmitter {
    config: TransmitConfig,
    pubkey: String,
}

impl KeyTransmitter {
    /// 读取并校验公钥文件，创建传输器
    pub fn new(config: TransmitConfig) -> Result<Self> {
        let pubkey = read_public_key(&config.pubkey_path)?;
        Ok(Self { config, pubkey })
    }

    /// 本地公钥内容（已去除首尾空白）
    pub fn public_key(&self) -> &str {
        &self.pubkey
    }

    /// 按输入顺序向所有主机传输公钥
    ///
    /// 尽力而为语义：单台主机的连接、认证或远程 IO 失败只记录日志，
    /// 不影响后续主机。
    pub async fn run(&self, hosts: &[HostEntry]) -> TransmitReport {
        let mut report = TransmitReport::default();

        for host in hosts {
            info!("向 {} 传输公钥", host);
            let result = self.transmit_one(host).await;
            match &result {
                Ok(TransmitOutcome::Added) => {
                    info!("公钥已追加到 {} 的 {}", host, AUTH_KEYS_FILE);
                }
                Ok(TransmitOutcome::AlreadyPresent) => {
                    warn!("公钥在 {} 的 {} 中已存在", host, AUTH_KEYS_FILE);
                }
                Err(err) => {
                    error!("向 {} 传输公钥失败: {}", host, err);
                }
            }
            report.results.push((host.clone(), result));
        }

        let errored = report.errored_hosts();
        if !errored.is_empty() {
            let names: Vec<String> = errored.iter().map(|host| host.to_string()).collect();
            warn!("失败主机: {}", names.join(", "));
        }
        info!("公钥 {} 传输完成", self.config.pubkey_path.display());

        report
    }

    /// 处理单台主机，无论成败都在返回前关闭会话
    async fn transmit_one(&self, host: &HostEntry) -> Result<TransmitOutcome> {
        let mut client = SshClient::connect(
            host,
            &self.config.credentials.username,
            &self.config.credentials.password,
            self.config.proxy.as_ref(),
        )
        .await?;

        let result = self.put_public_key(&mut client, host).await;

        if let Err(err) = client.disconnect().await {
            debug!("关闭 {} 会话失败: {}", host, err);
        }

        result
    }

    async fn put_public_key(
        &self,
        client: &mut SshClient,
        host: &HostEntry,
    ) -> Result<TransmitOutcome> {
        let existing = if client.file_exists(AUTH_KEYS_FILE).await? {
            client.read_file(AUTH_KEYS_FILE).await?
        } else {
            warn!("{} 上不存在 {}，将创建", host, AUTH_KEYS_FILE);
            String::new()
        };

        let Some(updated) = authorized_keys::append_key(&existing, &self.pubkey) else {
            return Ok(TransmitOutcome::AlreadyPresent);
        };

        // 整体重写文件，避免对公钥内容做 shell 转义
        let command = format!(
            "mkdir -p {dir} && chmod 700 {dir} && cat > {file} && chmod 600 {file}",
            dir = SSH_DIR,
            file = AUTH_KEYS_FILE,
        );
        let output = client
            .execute_with_stdin(&command, Some(updated.as_bytes()))
            .await?;
        if !output.is_success() {
            return Err(TransmitError::RemoteIoError(format!(
                "写入 {} 失败 (退出码 {:?}): {}",
                AUTH_KEYS_FILE, output.exit_code, output.stderr
            )));
        }

        Ok(TransmitOutcome::Added)
    }
}

/// 读取本地公钥文件，校验内容非空
fn read_public_key(path: &Path) -> Result<String> {
    let path = expand_path(path);
    info!("读取公钥文件 {}", path.display());

    let content = std::fs::read_to_string(&path).map_err(|err| {
        TransmitError::ConfigError(format!("无法读取公钥文件 {}: {}", path.display(), err))
    })?;

    let pubkey = content.trim();
    if pubkey.is_empty() {
        return Err(TransmitError::ConfigError(format!(
            "公钥文件 {} 为空",
            path.display()
        )));
    }

    Ok(pubkey.to_string())
}
