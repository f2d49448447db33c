//! 会话凭证
//!
//! Cookie 是与服务端交互的唯一鉴权凭证，内容不透明。这里把它做成显式的
//! 值类型，由调用方持有并以 `&mut` 传进每次请求，而不是藏在 client 内部。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use urlencoding::encode;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Session {
    cookies: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登录态以 `MUSIC_U` cookie 的存在为准
    pub fn is_authenticated(&self) -> bool {
        self.cookies.contains_key("MUSIC_U")
    }

    /// `__csrf` cookie 值，缺失时为空串（weapi 负载需要 csrf_token 字段）
    pub fn csrf_token(&self) -> String {
        self.cookies.get("__csrf").cloned().unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cookies.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// 吸收响应中的全部 Set-Cookie。服务端每次鉴权调用都会刷新凭证。
    pub fn absorb(&mut self, set_cookie_headers: &[String]) {
        for sc in set_cookie_headers {
            if let Ok(c) = cookie::Cookie::parse(sc.to_owned()) {
                self.cookies.insert(c.name().to_owned(), c.value().to_owned());
            }
        }
    }

    /// 拼成请求用的 Cookie header 值
    pub fn header_value(&self) -> String {
        let mut parts = Vec::with_capacity(self.cookies.len());
        for (k, v) in &self.cookies {
            parts.push(format!("{}={}", encode(k), encode(v)));
        }
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_set_cookie() {
        let mut s = Session::new();
        s.absorb(&[
            "MUSIC_U=abc123; Path=/; HttpOnly".to_owned(),
            "__csrf=tok; Path=/".to_owned(),
        ]);
        assert!(s.is_authenticated());
        assert_eq!(s.csrf_token(), "tok");
    }

    #[test]
    fn test_absorb_refreshes_existing() {
        let mut s = Session::new();
        s.insert("MUSIC_U", "old");
        s.absorb(&["MUSIC_U=new; Path=/".to_owned()]);
        assert_eq!(s.get("MUSIC_U"), Some("new"));
    }

    #[test]
    fn test_clear() {
        let mut s = Session::new();
        s.insert("MUSIC_U", "abc");
        s.clear();
        assert!(!s.is_authenticated());
        assert!(s.is_empty());
        assert_eq!(s.csrf_token(), "");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut s = Session::new();
        s.insert("MUSIC_U", "abc");
        s.insert("__csrf", "tok");
        let text = serde_json::to_string(&s).unwrap();
        let restored: Session = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.get("MUSIC_U"), Some("abc"));
        assert_eq!(restored.csrf_token(), "tok");
    }
}
