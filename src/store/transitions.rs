//! 纯状态转移
//!
//! commit 的等价物：不做 IO、不碰网络的纯函数，action 层只通过这些入口
//! 改状态。下标运算与循环模式在这里集中实现并测试。

use rand::Rng;

use crate::domain::{PlaylistMeta, Track, UserInfo};
use crate::store::state::{AppState, LoginState, LoopMode};

// ---------- 会话状态机 ----------

pub fn begin_login(state: &mut AppState) {
    state.login = LoginState::LoginPending;
}

pub fn commit_login(state: &mut AppState, user: UserInfo) {
    state.user = user;
    state.login = LoginState::LoggedIn;
}

/// 已有用户资料的前提下确认会话有效（恢复路径）
pub fn confirm_login(state: &mut AppState) {
    state.login = LoginState::LoggedIn;
}

pub fn invalidate_login(state: &mut AppState) {
    state.login = LoginState::LoginInvalid;
}

/// 登出：用户、歌单与收藏缓存一并清空
pub fn commit_logout(state: &mut AppState) {
    state.login = LoginState::LoggedOut;
    state.user = UserInfo::default();
    state.user_playlists.clear();
    state.favorites.clear();
}

pub fn set_user(state: &mut AppState, user: UserInfo) {
    state.user = user;
}

/// 用歌单 creator 字段补全用户资料（恢复路径里昵称常常就来自这里）
pub fn merge_user_info(state: &mut AppState, creator: &UserInfo) {
    if state.user.id == 0 || state.user.id == creator.id {
        state.user = creator.clone();
    }
}

// ---------- 歌单 ----------

pub fn set_user_playlists(state: &mut AppState, lists: Vec<PlaylistMeta>) {
    state.user_playlists = lists;
}

/// 把拉到的 detail 覆盖进已有条目；没有对应条目时追加
pub fn overlay_playlist_detail(state: &mut AppState, detail: PlaylistMeta) {
    match state
        .user_playlists
        .iter_mut()
        .find(|p| p.id == detail.id)
    {
        Some(existing) => *existing = detail,
        None => state.user_playlists.push(detail),
    }
}

pub fn commit_subscribe(state: &mut AppState, meta: PlaylistMeta) {
    if !state.user_playlists.iter().any(|p| p.id == meta.id) {
        state.user_playlists.push(meta);
    }
}

pub fn commit_unsubscribe(state: &mut AppState, id: i64) {
    state.user_playlists.retain(|p| p.id != id);
}

// ---------- 播放队列 ----------

pub fn set_queue(state: &mut AppState, tracks: Vec<Track>) {
    state.queue.tracks = tracks;
    state.queue.index = 0;
}

/// 下标越界时拒绝并返回 false
pub fn set_current_index(state: &mut AppState, index: usize) -> bool {
    if index >= state.queue.tracks.len() {
        return false;
    }
    state.queue.index = index;
    true
}

pub fn insert_tracks(state: &mut AppState, tracks: Vec<Track>, index: usize) {
    let at = index.min(state.queue.tracks.len());
    for (offset, t) in tracks.into_iter().enumerate() {
        state.queue.tracks.insert(at + offset, t);
    }
}

// ---------- 下标运算与循环模式 ----------

/// 顺循环前进。List 与 Single 在本层同义（单曲重复由更上层决定是否重播），
/// Random 在 `[0, len)` 均匀取。空队列无下一首。
pub fn next_index(
    index: usize,
    len: usize,
    mode: LoopMode,
    rng: &mut impl Rng,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match mode {
        LoopMode::Random => rng.gen_range(0..len),
        LoopMode::List | LoopMode::Single => (index + 1) % len,
    })
}

pub fn previous_index(
    index: usize,
    len: usize,
    mode: LoopMode,
    rng: &mut impl Rng,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match mode {
        LoopMode::Random => rng.gen_range(0..len),
        LoopMode::List | LoopMode::Single => (index + len - 1) % len,
    })
}

/// 整列播放的起始下标：Random 随机，其余从头开始
pub fn first_index(len: usize, mode: LoopMode, rng: &mut impl Rng) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match mode {
        LoopMode::Random => rng.gen_range(0..len),
        _ => 0,
    })
}

/// 循环模式三态环：List → Single → Random → List
pub fn cycle_loop_mode(mode: LoopMode) -> LoopMode {
    match mode {
        LoopMode::List => LoopMode::Single,
        LoopMode::Single => LoopMode::Random,
        LoopMode::Random => LoopMode::List,
    }
}
