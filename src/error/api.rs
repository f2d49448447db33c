//! 远端 API 调用错误

use crate::netease::crypto::CryptoError;

/// 传输层与编解码错误
///
/// 注意：服务端应用层的 `code != 200` 不属于这里，响应体原样交给调用方判断。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("reqwest 错误: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("请求加密失败: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Header 构造失败: {0}")]
    BadHeader(String),

    #[error("输入错误: {0}")]
    BadInput(&'static str),

    #[error("响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}
