//! 状态层与本地持久化错误

use super::ApiError;

/// action 层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 底层传输/编解码失败
    #[error("API 调用失败: {0}")]
    Api(#[from] ApiError),

    /// 服务端应用层拒绝（`code != 200`），响应码原样上抛，调用方自行处理
    #[error("服务端返回 code={code}")]
    Rejected { code: i64 },

    /// 持久化读写失败
    #[error("本地存储错误: {0}")]
    Storage(#[from] StorageError),
}

/// 本地 key-value 存储错误
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),
}
