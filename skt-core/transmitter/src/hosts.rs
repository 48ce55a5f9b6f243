//! 主机列表解析
//!
//! 目标主机来自命令行标记和主机列表文件两处，
//! 按出现顺序合并，不做去重。

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::expand_path;
use crate::error::{Result, TransmitError};

/// 默认 SSH 端口
pub const DEFAULT_SSH_PORT: u16 = 22;

/// 目标主机
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// 主机地址
    pub address: String,
    /// SSH 端口
    pub port: u16,
}

impl HostEntry {
    /// 解析 `host` 或 `host:port` 形式的主机标记
    ///
    /// 未指定端口时使用默认端口 22。
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || TransmitError::ParseError(format!("无效的主机标记 \"{}\"", token));

        match token.split_once(':') {
            None => {
                if token.is_empty() {
                    return Err(invalid());
                }
                Ok(Self {
                    address: token.to_string(),
                    port: DEFAULT_SSH_PORT,
                })
            }
            Some((address, port)) => {
                if address.is_empty() || port.contains(':') {
                    return Err(invalid());
                }
                let port: u16 = port.parse().map_err(|_| invalid())?;
                Ok(Self {
                    address: address.to_string(),
                    port,
                })
            }
        }
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// 汇总命令行与主机文件中的目标主机
///
/// 命令行标记在前，文件内容按逗号/空白切分后追加。
/// 两处来源都为空时返回配置错误。
pub fn resolve_hosts(literals: &[String], hosts_file: Option<&Path>) -> Result<Vec<HostEntry>> {
    let mut entries = Vec::new();

    for token in literals {
        entries.push(HostEntry::parse(token)?);
    }

    if let Some(path) = hosts_file {
        let path = expand_path(path);
        info!("读取主机列表文件 {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|err| {
            TransmitError::ConfigError(format!("无法读取主机文件 {}: {}", path.display(), err))
        })?;
        for token in content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            entries.push(HostEntry::parse(token)?);
        }
    }

    if entries.is_empty() {
        return Err(TransmitError::ConfigError("未提供任何目标主机".to_string()));
    }

    debug!("解析到 {} 台目标主机", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_host_with_port() {
        let entry = HostEntry::parse("10.0.0.1:2222").unwrap();
        assert_eq!(entry.address, "10.0.0.1");
        assert_eq!(entry.port, 2222);
    }

    #[test]
    fn test_parse_host_default_port() {
        let entry = HostEntry::parse("10.0.0.1").unwrap();
        assert_eq!(entry.address, "10.0.0.1");
        assert_eq!(entry.port, DEFAULT_SSH_PORT);
    }

    #[test]
    fn test_parse_invalid_tokens() {
        for token in ["", ":22", "host:", "host:abc", "host:70000", "a:1:2"] {
            let err = HostEntry::parse(token).unwrap_err();
            assert!(matches!(err, TransmitError::ParseError(_)), "{}", token);
            // 错误信息包含出错的标记
            assert!(err.to_string().contains(token));
        }
    }

    #[test]
    fn test_display() {
        let entry = HostEntry::parse("example.com").unwrap();
        assert_eq!(entry.to_string(), "example.com:22");
    }

    #[test]
    fn test_resolve_hosts_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a, b:2200 c").unwrap();

        let entries = resolve_hosts(&[], Some(file.path())).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], HostEntry::parse("a").unwrap());
        assert_eq!(entries[1], HostEntry::parse("b:2200").unwrap());
        assert_eq!(entries[2], HostEntry::parse("c").unwrap());
    }

    #[test]
    fn test_resolve_hosts_merges_sources_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "filehost:2200\nfilehost").unwrap();

        let literals = vec!["clihost".to_string(), "clihost:2222".to_string()];
        let entries = resolve_hosts(&literals, Some(file.path())).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].address, "clihost");
        assert_eq!(entries[1].port, 2222);
        assert_eq!(entries[2].address, "filehost");
        // 重复主机不做去重
        assert_eq!(entries[3], HostEntry::parse("filehost").unwrap());
    }

    #[test]
    fn test_resolve_hosts_empty_is_config_error() {
        let err = resolve_hosts(&[], None).unwrap_err();
        assert!(matches!(err, TransmitError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_hosts_missing_file() {
        let err = resolve_hosts(&[], Some(Path::new("/nonexistent/hosts.txt"))).unwrap_err();
        assert!(matches!(err, TransmitError::ConfigError(_)));
    }
}
