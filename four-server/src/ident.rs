//! 不透明 ID 生成
//!
//! 对局 ID 与玩家身份令牌共用同一个生成器。

use rand::distributions::Alphanumeric;
use rand::Rng;

use protocol::IDENT_LEN;

/// 生成一个 16 位字母数字随机 ID
pub fn new_ident() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(IDENT_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_shape() {
        let id = new_ident();
        assert_eq!(id.chars().count(), IDENT_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_idents_differ() {
        assert_ne!(new_ident(), new_ident());
    }
}
