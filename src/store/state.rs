//! 共享应用状态
//!
//! 全局可变 store 的替代：显式的状态容器，按 `&mut` 传给 action，所有
//! 变更都经由指定的转移入口（见 `transitions`），不允许外部读改写。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{PlaylistMeta, Quality, Track, UserInfo};
use crate::lyrics::TrackLyric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginState {
    #[default]
    LoggedOut,
    LoginPending,
    LoggedIn,
    LoginInvalid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopMode {
    #[default]
    List,
    Single,
    Random,
}

/// 播放队列：曲目、当前下标、循环模式
///
/// 不变量：tracks 非空时 index 恒在 `[0, len)`。
#[derive(Debug, Default, Clone)]
pub struct PlayQueue {
    pub tracks: Vec<Track>,
    pub index: usize,
    pub loop_mode: LoopMode,
}

impl PlayQueue {
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// 退出登录时需要清空的 UI 派生收藏缓存
#[derive(Debug, Default, Clone)]
pub struct FavCaches {
    pub album: Option<Value>,
    pub artist: Option<Value>,
    pub video: Option<Value>,
}

impl FavCaches {
    pub fn clear(&mut self) {
        self.album = None;
        self.artist = None;
        self.video = None;
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub login: LoginState,
    pub user: UserInfo,
    pub user_playlists: Vec<PlaylistMeta>,
    pub queue: PlayQueue,
    pub quality: Quality,
    pub playing_url: Option<String>,
    pub active_lyric: Option<TrackLyric>,
    pub paused: bool,
    pub favorites: FavCaches,
}

pub const SNAPSHOT_VERSION: u8 = 1;

/// 播放队列的持久化快照（`playlist` 键）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    pub version: u8,
    pub tracks: Vec<Track>,
    pub index: usize,
    pub loop_mode: String,
    pub saved_at_epoch_ms: i64,
}

pub fn loop_mode_to_string(m: LoopMode) -> String {
    match m {
        LoopMode::List => "List",
        LoopMode::Single => "Single",
        LoopMode::Random => "Random",
    }
    .to_owned()
}

pub fn loop_mode_from_string(s: &str) -> LoopMode {
    match s {
        "Single" => LoopMode::Single,
        "Random" => LoopMode::Random,
        _ => LoopMode::List,
    }
}
