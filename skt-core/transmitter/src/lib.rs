//! SSH 公钥传输核心
//!
//! 提供向远程主机批量下发 SSH 公钥的能力，支持：
//! - 密码认证
//! - SOCKS5 代理隧道
//! - authorized_keys 幂等追加（已存在的公钥不重复写入）
//! - 逐台主机顺序处理，单台失败不中断批量
//!
//! # 示例
//!
//! ```ignore
//! use skt_transmitter::{resolve_hosts, Credentials, KeyTransmitter, TransmitConfig};
//!
//! let hosts = resolve_hosts(&["192.168.1.100:2222".to_string()], None)?;
//! let config = TransmitConfig {
//!     credentials: Credentials {
//!         username: "root".to_string(),
//!         password: "password".to_string(),
//!     },
//!     pubkey_path: "~/.ssh/id_ed25519.pub".into(),
//!     proxy: None,
//! };
//! let transmitter = KeyTransmitter::new(config)?;
//! let report = transmitter.run(&hosts).await;
//! ```

pub mod authorized_keys;
mod client;
mod config;
mod error;
mod hosts;
mod transmitter;

pub use client::{CommandOutput, SshClient};
pub use config::{expand_path, Credentials, ProxyConfig, TransmitConfig};
pub use error::{Result, TransmitError};
pub use hosts::{resolve_hosts, HostEntry, DEFAULT_SSH_PORT};
pub use transmitter::{KeyTransmitter, TransmitOutcome, TransmitReport};
