//! 传输配置

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 认证凭据
///
/// 明文保存，仅存活于进程生命周期。
#[derive(Clone)]
pub struct Credentials {
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

// 日志和调试输出中不暴露密码
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// SOCKS5 代理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// 代理主机
    pub host: String,
    /// 代理端口
    pub port: u16,
}

impl ProxyConfig {
    /// 获取代理地址字符串（host:port 格式）
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 传输器配置
#[derive(Debug, Clone)]
pub struct TransmitConfig {
    /// 认证凭据
    pub credentials: Credentials,
    /// 公钥文件路径
    pub pubkey_path: PathBuf,
    /// SOCKS5 代理（可选）
    pub proxy: Option<ProxyConfig>,
}

/// 展开路径中的 ~ 前缀
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(path_str.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_address() {
        let proxy = ProxyConfig {
            host: "127.0.0.1".to_string(),
            port: 1080,
        };
        assert_eq!(proxy.address(), "127.0.0.1:1080");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "root".to_string(),
            password: "secret".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("root"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_expand_path() {
        let path = PathBuf::from("/etc/hosts");
        assert_eq!(expand_path(&path), path);

        if let Some(home) = dirs::home_dir() {
            let expanded = expand_path(Path::new("~/.ssh/id_rsa.pub"));
            assert!(expanded.starts_with(home));
        }
    }
}
