//! API Facade
//!
//! 每个远端端点一个方法：构造 JSON 负载，经签名 POST 发出，把响应整形成
//! 类型化 DTO。应用层 `code` 原样带回，传输失败以 `Err` 上抛，不做重试。

use md5::{Digest, Md5};
use serde_json::{Value, json};

use super::client::NcmClient;
use super::dto::{
    CodeResp, CommentsResp, DailySuggestionsResp, ListDetailResp, LoginResp, LyricResp,
    MusicUrlResp, PlayRecordResp, UserPlaylistResp,
};
use super::session::Session;
use crate::domain::{Quality, SongIds};
use crate::error::ApiError;
use crate::lyrics::{self, TrackLyric};

fn parse<T: serde::de::DeserializeOwned>(v: Value) -> Result<T, ApiError> {
    serde_json::from_value(v).map_err(ApiError::Decode)
}

/// 大陆手机号：1 开头的 11 位数字，走 cellphone 登录端点
fn is_phone_number(acc: &str) -> bool {
    acc.len() == 11 && acc.starts_with('1') && acc.bytes().all(|b| b.is_ascii_digit())
}

fn md5_hex(s: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

impl NcmClient {
    pub async fn login(
        &self,
        session: &mut Session,
        acc: &str,
        pwd: &str,
    ) -> Result<LoginResp, ApiError> {
        let password = md5_hex(pwd);
        let v = if is_phone_number(acc) {
            self.post(
                session,
                "login/cellphone",
                json!({
                    "phone": acc,
                    "password": password,
                    "rememberLogin": true,
                }),
            )
            .await?
        } else {
            self.post(
                session,
                "login",
                json!({
                    "username": acc,
                    "password": password,
                    "rememberLogin": true,
                }),
            )
            .await?
        };
        parse(v)
    }

    /// 校验恢复出来的 cookie 是否仍然有效
    pub async fn refresh_login(&self, session: &mut Session) -> Result<CodeResp, ApiError> {
        let v = self.post(session, "login/token/refresh", json!({})).await?;
        parse(v)
    }

    pub async fn logout(&self, session: &mut Session) -> Result<CodeResp, ApiError> {
        let v = self.post(session, "logout", json!({})).await?;
        parse(v)
    }

    pub async fn user_playlist(
        &self,
        session: &mut Session,
        uid: i64,
        limit: i64,
    ) -> Result<UserPlaylistResp, ApiError> {
        let v = self
            .post(
                session,
                "user/playlist",
                json!({
                    "uid": uid,
                    "offset": 0,
                    "limit": limit,
                }),
            )
            .await?;
        parse(v)
    }

    pub async fn music_record(
        &self,
        session: &mut Session,
        uid: i64,
    ) -> Result<PlayRecordResp, ApiError> {
        let v = self
            .post(
                session,
                "v1/play/record",
                json!({
                    "uid": uid,
                    "type": 0,
                }),
            )
            .await?;
        parse(v)
    }

    pub async fn daily_suggestions(
        &self,
        session: &mut Session,
    ) -> Result<DailySuggestionsResp, ApiError> {
        let v = self
            .post(
                session,
                "v1/discovery/recommend/songs",
                json!({
                    "offset": 0,
                    "total": true,
                    "limit": 20,
                }),
            )
            .await?;
        parse(v)
    }

    pub async fn list_detail(
        &self,
        session: &mut Session,
        id: i64,
    ) -> Result<ListDetailResp, ApiError> {
        let v = self
            .post(
                session,
                "v3/playlist/detail",
                json!({
                    "id": id,
                    "offset": 0,
                    "total": true,
                    "limit": 1000,
                    "n": 1000,
                }),
            )
            .await?;
        parse(v)
    }

    pub async fn music_url(
        &self,
        session: &mut Session,
        ids: SongIds,
        quality: Quality,
    ) -> Result<MusicUrlResp, ApiError> {
        let v = self
            .post(
                session,
                "song/enhance/player/url",
                json!({
                    "ids": ids.into_vec(),
                    "br": quality.bitrate(),
                }),
            )
            .await?;
        parse(v)
    }

    pub async fn music_comments(
        &self,
        session: &mut Session,
        rid: i64,
        limit: i64,
        offset: i64,
    ) -> Result<CommentsResp, ApiError> {
        let v = self
            .post(
                session,
                &format!("v1/resource/comments/R_SO_4_{rid}"),
                json!({
                    "rid": rid,
                    "offset": offset,
                    "limit": limit,
                }),
            )
            .await?;
        parse(v)
    }

    /// 拉取歌词并合并翻译轨，返回构建完成后不再变动的 [`TrackLyric`]
    pub async fn music_lyric(
        &self,
        session: &mut Session,
        id: i64,
    ) -> Result<TrackLyric, ApiError> {
        let v = self
            .post(
                session,
                "song/lyric",
                json!({
                    "id": id,
                    "os": "pc",
                    "lv": -1,
                    "kv": -1,
                    "tv": -1,
                }),
            )
            .await?;
        let resp: LyricResp = parse(v)?;
        Ok(build_track_lyric(resp))
    }

    pub async fn submit_web_log(
        &self,
        session: &mut Session,
        action: &str,
        payload: Value,
    ) -> Result<CodeResp, ApiError> {
        let text = serde_json::to_string(&payload).map_err(ApiError::Decode)?;
        let v = self
            .post(
                session,
                "log/web",
                json!({
                    "action": action,
                    "json": text,
                }),
            )
            .await?;
        parse(v)
    }

    /// 播放完成上报（打卡）
    pub async fn submit_listened(
        &self,
        session: &mut Session,
        id: i64,
        time_secs: f64,
    ) -> Result<CodeResp, ApiError> {
        self.submit_web_log(
            session,
            "play",
            json!({
                "id": id,
                "type": "song",
                "wifi": 0,
                "download": 0,
                "time": time_secs.round() as i64,
                "end": "playend",
            }),
        )
        .await
    }

    pub async fn subscribe_playlist(
        &self,
        session: &mut Session,
        id: i64,
    ) -> Result<CodeResp, ApiError> {
        let v = self
            .post(session, "playlist/subscribe", json!({ "id": id }))
            .await?;
        parse(v)
    }

    pub async fn unsubscribe_playlist(
        &self,
        session: &mut Session,
        id: i64,
    ) -> Result<CodeResp, ApiError> {
        let v = self
            .post(session, "playlist/unsubscribe", json!({ "id": id }))
            .await?;
        parse(v)
    }
}

/// 歌词响应 → 解析 + 翻译合并
///
/// version 为 0 的 blob 视为不存在；主轨缺失时无从合并，mlrc 置空。
fn build_track_lyric(resp: LyricResp) -> TrackLyric {
    let mut out = TrackLyric::default();

    if let Some(block) = resp.lrc {
        if block.version != 0 {
            out.lrc = Some(lyrics::lrc::parse(&block.lyric));
            out.lyric_user = resp.lyric_user;
        }
    }

    if let Some(block) = resp.tlyric {
        if block.version != 0 {
            let tlrc = lyrics::lrc::parse(&block.lyric);
            if let Some(primary) = &out.lrc {
                out.trans_user = resp.trans_user;
                out.mlrc = Some(lyrics::merge(primary, &tlrc));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netease::dto::{LyricBlock, LyricContributor};

    #[test]
    fn test_is_phone_number() {
        assert!(is_phone_number("13800138000"));
        assert!(!is_phone_number("2380013800"));
        assert!(!is_phone_number("1380013800"));
        assert!(!is_phone_number("user@example.com"));
        assert!(!is_phone_number("1380013800a"));
    }

    #[test]
    fn test_md5_hex_known_digest() {
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_build_track_lyric_without_translation() {
        let resp = LyricResp {
            code: 200,
            lrc: Some(LyricBlock {
                version: 5,
                lyric: "[00:01.00]第一行".to_owned(),
            }),
            tlyric: None,
            lyric_user: Some(LyricContributor {
                nickname: "贡献者".to_owned(),
            }),
            trans_user: None,
        };
        let tl = build_track_lyric(resp);
        assert_eq!(tl.lrc.as_ref().unwrap().lines.len(), 1);
        assert!(tl.mlrc.is_none());
        assert_eq!(tl.lyric_user.unwrap().nickname, "贡献者");
    }

    #[test]
    fn test_build_track_lyric_version_zero_ignored() {
        let resp = LyricResp {
            code: 200,
            lrc: Some(LyricBlock {
                version: 0,
                lyric: "[00:01.00]不应出现".to_owned(),
            }),
            tlyric: None,
            lyric_user: None,
            trans_user: None,
        };
        let tl = build_track_lyric(resp);
        assert!(tl.lrc.is_none());
        assert!(tl.mlrc.is_none());
    }

    #[test]
    fn test_build_track_lyric_translation_without_primary() {
        // 只有翻译轨没有主轨：无从合并
        let resp = LyricResp {
            code: 200,
            lrc: None,
            tlyric: Some(LyricBlock {
                version: 3,
                lyric: "[00:01.00]翻译".to_owned(),
            }),
            lyric_user: None,
            trans_user: None,
        };
        let tl = build_track_lyric(resp);
        assert!(tl.lrc.is_none());
        assert!(tl.mlrc.is_none());
    }

    #[test]
    fn test_build_track_lyric_merged() {
        let resp = LyricResp {
            code: 200,
            lrc: Some(LyricBlock {
                version: 5,
                lyric: "[00:00.00]a\n[00:10.00]b".to_owned(),
            }),
            tlyric: Some(LyricBlock {
                version: 2,
                lyric: "[00:10.00]b-tr".to_owned(),
            }),
            lyric_user: None,
            trans_user: None,
        };
        let tl = build_track_lyric(resp);
        let mlrc = tl.mlrc.unwrap();
        assert_eq!(mlrc.lines.len(), 2);
        assert_eq!(mlrc.lines[1].trans.as_deref(), Some("b-tr"));
    }
}
