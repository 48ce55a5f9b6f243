//! authorized_keys 内容处理
//!
//! 只做字符串层面的判断与追加，远程读写由传输器负责。

/// 判断公钥是否已作为独立行存在
pub fn contains_key(content: &str, pubkey: &str) -> bool {
    content.lines().any(|line| line.trim() == pubkey)
}

/// 将公钥追加到 authorized_keys 内容
///
/// 公钥已存在时返回 `None`（幂等），否则返回追加后的完整内容，
/// 恰好增加一行并以换行结尾。
pub fn append_key(content: &str, pubkey: &str) -> Option<String> {
    if contains_key(content, pubkey) {
        return None;
    }

    let mut updated = String::with_capacity(content.len() + pubkey.len() + 2);
    updated.push_str(content);
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(pubkey);
    updated.push('\n');
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIFoo user@example";
    const OTHER_KEY: &str = "ssh-rsa AAAAB3NzaC1yc2EBar other@example";

    #[test]
    fn test_append_to_empty_file() {
        let updated = append_key("", KEY).unwrap();
        assert_eq!(updated, format!("{}\n", KEY));
        assert_eq!(updated.lines().count(), 1);
    }

    #[test]
    fn test_append_adds_exactly_one_line() {
        let existing = format!("{}\n", OTHER_KEY);
        let updated = append_key(&existing, KEY).unwrap();
        assert_eq!(updated.lines().count(), existing.lines().count() + 1);
        assert!(contains_key(&updated, KEY));
        assert!(contains_key(&updated, OTHER_KEY));
    }

    #[test]
    fn test_append_existing_key_is_noop() {
        let existing = format!("{}\n{}\n", OTHER_KEY, KEY);
        assert!(append_key(&existing, KEY).is_none());
    }

    #[test]
    fn test_append_handles_missing_trailing_newline() {
        let existing = OTHER_KEY.to_string();
        let updated = append_key(&existing, KEY).unwrap();
        assert_eq!(updated, format!("{}\n{}\n", OTHER_KEY, KEY));
    }

    #[test]
    fn test_contains_key_ignores_surrounding_whitespace() {
        let existing = format!("  {}  \n", KEY);
        assert!(contains_key(&existing, KEY));
        assert!(append_key(&existing, KEY).is_none());
    }
}
