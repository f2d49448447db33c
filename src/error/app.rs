//! 应用通用错误

use super::{ApiError, StorageError, StoreError};

/// 应用通用错误类型，binary 入口的统一出口
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("JSON 序列化失败: {0}")]
    Serde(#[from] serde_json::Error),

    /// 远端 API 错误
    #[error("网易云音乐错误: {0}")]
    Api(#[from] ApiError),

    /// 状态层错误
    #[error("状态层错误: {0}")]
    Store(#[from] StoreError),

    /// 本地存储错误
    #[error("本地存储错误: {0}")]
    Storage(#[from] StorageError),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}
