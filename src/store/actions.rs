//! action 层
//!
//! 登录、歌单持久化与播放推进的编排：调 API Facade，把归一化结果经
//! `transitions` 提交进 [`AppState`]。凭证（[`Session`]）与存储都由调用方
//! 持有并显式传入。服务端 `code != 200` 一律按软失败处理：保持既有状态，
//! 需要上抛时抛响应码本身。

use chrono::Utc;

use crate::domain::{PlaylistMeta, SongIds, Track, UserInfo};
use crate::error::StoreError;
use crate::netease::dto::{CodeResp, LoginResp};
use crate::netease::{NcmClient, Session};
use crate::storage::KvStorage;
use crate::store::state::{
    AppState, PlaylistSnapshot, SNAPSHOT_VERSION, loop_mode_from_string, loop_mode_to_string,
};
use crate::store::transitions;

const KEY_USER: &str = "user";
const KEY_COOKIE: &str = "cookie";
const KEY_PLAYLIST: &str = "playlist";

/// 第一张歌单是"我喜欢的音乐"时自动拉全量详情
const LIKED_SONGS_SUFFIX: &str = "喜欢的音乐";

const PLAYLIST_FETCH_LIMIT: i64 = 30;

const OK: i64 = 200;

// ---------- 会话 ----------

/// 账号登录。成功（code 200）提交 LoggedIn、持久化凭证并拉取歌单；
/// 失败则清空凭证并进入 LoginInvalid。响应原样带回给调用方。
pub async fn login<S: KvStorage>(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    storage: &mut S,
    acc: &str,
    pwd: &str,
) -> Result<LoginResp, StoreError> {
    transitions::begin_login(state);
    let resp = client.login(session, acc, pwd).await?;
    if resp.code == OK {
        let user = resp
            .profile
            .as_ref()
            .map(|p| UserInfo {
                id: p.user_id,
                nickname: p.nickname.clone(),
            })
            .unwrap_or_default();
        transitions::commit_login(state, user);
        store_user(state, session, storage)?;
        if let Err(e) = refresh_user_playlists(state, session, client).await {
            tracing::warn!(err = %e, "登录后拉取歌单失败");
        }
    } else {
        session.clear();
        transitions::invalidate_login(state);
    }
    Ok(resp)
}

/// 持久化用户信息与当前凭证
pub fn store_user<S: KvStorage>(
    state: &AppState,
    session: &Session,
    storage: &mut S,
) -> Result<(), StoreError> {
    let user = serde_json::to_string(&state.user).map_err(crate::error::StorageError::Serde)?;
    let cookie = serde_json::to_string(session).map_err(crate::error::StorageError::Serde)?;
    storage.set(KEY_USER, &user)?;
    storage.set(KEY_COOKIE, &cookie)?;
    Ok(())
}

/// 启动恢复：读出持久化的 user+cookie 乐观套用（LoginPending），再向服务端
/// 校验；校验失败回退为清空凭证。返回是否恢复成功。
pub async fn restore_user<S: KvStorage>(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    storage: &mut S,
) -> Result<bool, StoreError> {
    let (Some(user_raw), Some(cookie_raw)) = (storage.get(KEY_USER), storage.get(KEY_COOKIE))
    else {
        return Ok(false);
    };

    let user: UserInfo = match serde_json::from_str(&user_raw) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(err = %e, "持久化用户信息损坏，跳过恢复");
            return Ok(false);
        }
    };
    let restored: Session = match serde_json::from_str(&cookie_raw) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(err = %e, "持久化 cookie 损坏，跳过恢复");
            return Ok(false);
        }
    };

    transitions::set_user(state, user);
    transitions::begin_login(state);
    *session = restored;

    let resp = client.refresh_login(session).await?;
    if resp.code == OK {
        set_login_valid(state, session, client, storage).await?;
        Ok(true)
    } else {
        session.clear();
        transitions::invalidate_login(state);
        Ok(false)
    }
}

/// 会话确认有效后的收尾：置 LoggedIn、持久化刷新过的 cookie、拉歌单并在
/// 首张是"喜欢的音乐"时叠加完整详情。
pub async fn set_login_valid<S: KvStorage>(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    storage: &mut S,
) -> Result<(), StoreError> {
    transitions::confirm_login(state);
    let cookie = serde_json::to_string(session).map_err(crate::error::StorageError::Serde)?;
    storage.set(KEY_COOKIE, &cookie)?;
    refresh_user_playlists(state, session, client).await
}

/// 登出。服务端确认后清空会话、凭证与派生缓存。
pub async fn logout<S: KvStorage>(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    storage: &mut S,
) -> Result<CodeResp, StoreError> {
    let resp = client.logout(session).await?;
    if resp.code == OK {
        transitions::commit_logout(state);
        session.clear();
        storage.remove(KEY_USER)?;
        storage.remove(KEY_COOKIE)?;
    }
    Ok(resp)
}

// ---------- 歌单 ----------

/// 拉取用户歌单并提交；首张歌单的 creator 用来补全用户资料，名字以
/// "喜欢的音乐"结尾时顺带拉全量详情叠加。
pub async fn refresh_user_playlists(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
) -> Result<(), StoreError> {
    let resp = client
        .user_playlist(session, state.user.id, PLAYLIST_FETCH_LIMIT)
        .await?;
    if resp.code != OK {
        return Err(StoreError::Rejected { code: resp.code });
    }

    let lists: Vec<PlaylistMeta> = resp.playlist.into_iter().map(|p| p.into_meta()).collect();
    if let Some(first) = lists.first() {
        if let Some(creator) = &first.creator {
            transitions::merge_user_info(state, creator);
        }
    }
    let liked = lists
        .first()
        .filter(|p| p.name.ends_with(LIKED_SONGS_SUFFIX))
        .map(|p| p.id);
    transitions::set_user_playlists(state, lists);

    if let Some(id) = liked {
        if let Err(e) = update_playlist_detail(state, session, client, id).await {
            tracing::warn!(err = %e, playlist_id = id, "拉取喜欢的音乐详情失败");
        }
    }
    Ok(())
}

pub async fn update_playlist_detail(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    id: i64,
) -> Result<(), StoreError> {
    let resp = client.list_detail(session, id).await?;
    if resp.code != OK {
        return Err(StoreError::Rejected { code: resp.code });
    }
    if let Some(detail) = resp.playlist {
        let meta = PlaylistMeta {
            id: detail.id,
            name: detail.name,
            track_count: detail.track_count,
            creator: None,
            tracks: detail.tracks.into_iter().map(|t| t.into_track()).collect(),
        };
        transitions::overlay_playlist_detail(state, meta);
    }
    Ok(())
}

/// 收藏歌单。非 200 时状态保持不动，响应码原样上抛。
pub async fn subscribe_playlist(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    meta: PlaylistMeta,
) -> Result<CodeResp, StoreError> {
    let resp = client.subscribe_playlist(session, meta.id).await?;
    if resp.code != OK {
        return Err(StoreError::Rejected { code: resp.code });
    }
    transitions::commit_subscribe(state, meta);
    Ok(resp)
}

pub async fn unsubscribe_playlist(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    id: i64,
) -> Result<CodeResp, StoreError> {
    let resp = client.unsubscribe_playlist(session, id).await?;
    if resp.code != OK {
        return Err(StoreError::Rejected { code: resp.code });
    }
    transitions::commit_unsubscribe(state, id);
    Ok(resp)
}

// ---------- 播放 ----------

/// 按当前曲目刷新播放链接。非 200 或空链接按软失败处理，保留旧值。
pub async fn update_audio_src(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
) -> Result<(), StoreError> {
    let Some(track) = state.queue.current() else {
        return Ok(());
    };
    let id = track.id;
    let resp = client
        .music_url(session, SongIds::One(id), state.quality)
        .await?;
    if resp.code != OK {
        tracing::warn!(code = resp.code, song_id = id, "获取播放链接被拒，保持旧链接");
        return Ok(());
    }
    match resp.data.into_iter().next().and_then(|it| it.url) {
        Some(url) => state.playing_url = Some(url),
        None => {
            tracing::warn!(song_id = id, "播放链接为空，保持旧链接");
        }
    }
    Ok(())
}

/// 按当前曲目刷新歌词（解析 + 翻译合并在 facade 内完成）
pub async fn update_lyric(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
) -> Result<(), StoreError> {
    let Some(track) = state.queue.current() else {
        return Ok(());
    };
    let id = track.id;
    let lyric = client.music_lyric(session, id).await?;
    state.active_lyric = Some(lyric);
    Ok(())
}

/// 切到指定下标并连带刷新歌词与播放链接。越界下标被拒绝（无副作用）。
pub async fn play_track_index(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    index: usize,
) -> Result<(), StoreError> {
    if !transitions::set_current_index(state, index) {
        return Ok(());
    }
    state.active_lyric = None;
    if let Err(e) = update_lyric(state, session, client).await {
        tracing::warn!(err = %e, "刷新歌词失败");
    }
    update_audio_src(state, session, client).await?;
    state.paused = false;
    Ok(())
}

pub async fn play_next_track(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
) -> Result<(), StoreError> {
    let next = transitions::next_index(
        state.queue.index,
        state.queue.len(),
        state.queue.loop_mode,
        &mut rand::thread_rng(),
    );
    match next {
        Some(i) => play_track_index(state, session, client, i).await,
        None => Ok(()),
    }
}

pub async fn play_previous_track(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
) -> Result<(), StoreError> {
    let prev = transitions::previous_index(
        state.queue.index,
        state.queue.len(),
        state.queue.loop_mode,
        &mut rand::thread_rng(),
    );
    match prev {
        Some(i) => play_track_index(state, session, client, i).await,
        None => Ok(()),
    }
}

/// 整列播放：可选换列，随后从起始下标开始
pub async fn play_playlist(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    tracks: Option<Vec<Track>>,
) -> Result<(), StoreError> {
    if let Some(tracks) = tracks {
        transitions::set_queue(state, tracks);
    }
    let first = transitions::first_index(
        state.queue.len(),
        state.queue.loop_mode,
        &mut rand::thread_rng(),
    );
    match first {
        Some(i) => play_track_index(state, session, client, i).await,
        None => Ok(()),
    }
}

pub fn insert_track_into_playlist(
    state: &mut AppState,
    tracks: Vec<Track>,
    index: Option<usize>,
) {
    let at = index.unwrap_or(state.queue.index);
    transitions::insert_tracks(state, tracks, at);
}

pub fn next_loop_mode(state: &mut AppState) {
    state.queue.loop_mode = transitions::cycle_loop_mode(state.queue.loop_mode);
}

// ---------- 队列持久化 ----------

pub fn store_playlist<S: KvStorage>(
    state: &AppState,
    storage: &mut S,
) -> Result<(), StoreError> {
    let snapshot = PlaylistSnapshot {
        version: SNAPSHOT_VERSION,
        tracks: state.queue.tracks.clone(),
        index: state.queue.index,
        loop_mode: loop_mode_to_string(state.queue.loop_mode),
        saved_at_epoch_ms: Utc::now().timestamp_millis(),
    };
    let text =
        serde_json::to_string(&snapshot).map_err(crate::error::StorageError::Serde)?;
    storage.set(KEY_PLAYLIST, &text)?;
    Ok(())
}

/// 启动时恢复播放队列。损坏的快照只记日志，状态保持不动。
/// 恢复成功后顺带刷新播放链接与歌词（失败同样只记日志）。
pub async fn restore_playlist<S: KvStorage>(
    state: &mut AppState,
    session: &mut Session,
    client: &NcmClient,
    storage: &mut S,
) -> Result<bool, StoreError> {
    let Some(raw) = storage.get(KEY_PLAYLIST) else {
        return Ok(false);
    };
    let snapshot: PlaylistSnapshot = match serde_json::from_str(&raw) {
        Ok(s) => s,
        Err(e) => {
            tracing::info!(err = %e, "本地歌单快照无效，忽略");
            return Ok(false);
        }
    };
    if snapshot.version != SNAPSHOT_VERSION {
        tracing::info!(
            found = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "歌单快照版本不兼容，忽略"
        );
        return Ok(false);
    }

    let len = snapshot.tracks.len();
    state.queue.tracks = snapshot.tracks;
    state.queue.index = if len == 0 {
        0
    } else {
        snapshot.index.min(len - 1)
    };
    state.queue.loop_mode = loop_mode_from_string(&snapshot.loop_mode);
    state.paused = true;

    if let Err(e) = update_audio_src(state, session, client).await {
        tracing::warn!(err = %e, "恢复后刷新播放链接失败");
    }
    if let Err(e) = update_lyric(state, session, client).await {
        tracing::warn!(err = %e, "恢复后刷新歌词失败");
    }
    Ok(true)
}
