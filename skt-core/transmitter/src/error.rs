//! 传输器错误定义

use thiserror::Error;

/// 传输操作结果类型
pub type Result<T> = std::result::Result<T, TransmitError>;

/// 传输器错误类型
#[derive(Error, Debug)]
pub enum TransmitError {
    /// 配置错误（缺少主机、公钥为空等）
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 主机标记解析错误
    #[error("主机地址解析失败: {0}")]
    ParseError(String),

    /// 连接错误（TCP、代理或 SSH 握手失败）
    #[error("SSH 连接失败: {0}")]
    ConnectionError(String),

    /// 认证错误
    #[error("SSH 认证失败: {0}")]
    AuthenticationError(String),

    /// 远程读写错误
    #[error("远程 IO 错误: {0}")]
    RemoteIoError(String),

    /// 本地 IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}
