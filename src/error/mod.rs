//! 统一错误处理模块
//!
//! 按关注点拆分的结构化错误类型，全部基于 thiserror。

mod api;
mod app;
mod store;

pub use api::ApiError;
pub use app::AppError;
pub use store::{StorageError, StoreError};
