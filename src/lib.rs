//! 网易云音乐私有 web API 的接入层与应用状态层。
//!
//! 三块核心：签名 POST 客户端（[`netease`]）、歌词解析与翻译合并
//! （[`lyrics`]）、会话/播放列表状态机（[`store`]）。UI 与播放后端不在
//! 本 crate 范围内。

pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod lyrics;
pub mod netease;
pub mod storage;
pub mod store;
