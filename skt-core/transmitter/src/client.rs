//! SSH 客户端实现
//!
//! 基于 russh 的异步 SSH 客户端，支持直连和 SOCKS5 代理隧道两种方式，
//! 通过 exec 通道执行远程命令并收集输出。

use std::sync::Arc;

use russh::client::{self, Config, Handle, Handler};
use russh::keys::ssh_key;
use russh::ChannelMsg;
use tokio::net::TcpStream;
use tokio_socks::tcp::Socks5Stream;
use tracing::{debug, info};

use crate::config::ProxyConfig;
use crate::error::{Result, TransmitError};
use crate::hosts::HostEntry;

/// 命令执行输出
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// 标准输出
    pub stdout: String,
    /// 标准错误
    pub stderr: String,
    /// 退出码
    pub exit_code: Option<u32>,
}

impl CommandOutput {
    /// 检查命令是否成功执行
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// russh 客户端事件处理器
///
/// 自动接受服务端主机密钥，不校验 known_hosts。
pub struct ClientHandler;

impl Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

/// SSH 客户端
pub struct SshClient {
    handle: Handle<ClientHandler>,
}

impl SshClient {
    /// 连接到 SSH 服务器并完成密码认证
    ///
    /// 配置了代理时，先通过 SOCKS5 隧道建立到目标主机的 TCP 连接，
    /// 再在该连接上完成 SSH 握手。
    pub async fn connect(
        host: &HostEntry,
        username: &str,
        password: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self> {
        let config = Arc::new(Config::default());

        let mut handle = match proxy {
            Some(proxy) => {
                let proxy_addr = proxy.address();
                debug!("通过 SOCKS5 代理 {} 连接 {}", proxy_addr, host);
                let stream = Socks5Stream::connect(
                    proxy_addr.as_str(),
                    (host.address.as_str(), host.port),
                )
                .await
                .map_err(|err| {
                    TransmitError::ConnectionError(format!(
                        "SOCKS5 代理 {} 连接 {} 失败: {}",
                        proxy_addr, host, err
                    ))
                })?;
                client::connect_stream(config, stream, ClientHandler).await
            }
            None => {
                debug!("连接 {}", host);
                let stream = TcpStream::connect((host.address.as_str(), host.port))
                    .await
                    .map_err(|err| {
                        TransmitError::ConnectionError(format!("连接 {} 失败: {}", host, err))
                    })?;
                client::connect_stream(config, stream, ClientHandler).await
            }
        }
        .map_err(|err| TransmitError::ConnectionError(format!("{} SSH 握手失败: {}", host, err)))?;

        let auth = handle
            .authenticate_password(username, password)
            .await
            .map_err(|err| {
                TransmitError::ConnectionError(format!("{} 认证请求失败: {}", host, err))
            })?;
        if !auth.success() {
            return Err(TransmitError::AuthenticationError(format!(
                "主机 {} 拒绝了用户 {} 的密码认证",
                host, username
            )));
        }

        info!("SSH 连接成功: {}@{}", username, host);
        Ok(Self { handle })
    }

    /// 执行远程命令
    pub async fn execute(&mut self, command: &str) -> Result<CommandOutput> {
        self.execute_with_stdin(command, None).await
    }

    /// 执行远程命令，并将 `stdin` 内容写入命令标准输入
    pub async fn execute_with_stdin(
        &mut self,
        command: &str,
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput> {
        debug!("执行命令: {}", command);

        let remote_io =
            |err: russh::Error| TransmitError::RemoteIoError(format!("命令通道错误: {}", err));

        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(remote_io)?;
        channel.exec(true, command).await.map_err(remote_io)?;

        if let Some(data) = stdin {
            channel.data(data).await.map_err(remote_io)?;
        }
        channel.eof().await.map_err(remote_io)?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
                _ => {}
            }
        }

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            exit_code,
        };

        debug!(
            "命令执行完成, 退出码: {:?}, stdout 长度: {}, stderr 长度: {}",
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );

        Ok(result)
    }

    /// 检查远程文件是否存在
    pub async fn file_exists(&mut self, path: &str) -> Result<bool> {
        let output = self
            .execute(&format!("test -e {} && echo 1 || echo 0", path))
            .await?;
        Ok(output.stdout.trim() == "1")
    }

    /// 读取远程文件内容
    pub async fn read_file(&mut self, path: &str) -> Result<String> {
        let output = self.execute(&format!("cat {}", path)).await?;
        if !output.is_success() {
            return Err(TransmitError::RemoteIoError(format!(
                "读取 {} 失败: {}",
                path, output.stderr
            )));
        }
        Ok(output.stdout)
    }

    /// 关闭连接
    pub async fn disconnect(self) -> Result<()> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(|err| TransmitError::ConnectionError(format!("断开连接失败: {}", err)))?;
        Ok(())
    }
}
