//! 远端响应的反序列化模型
//!
//! 服务端 schema 未文档化，字段一律 `default`，只挑本层用得到的部分。
//! `code == 200` 是唯一的成功标记，所有响应都带上它。

use serde::Deserialize;

use crate::domain::{PlaylistMeta, Track, UserInfo};

/// 只关心 code 的响应（logout、subscribe、log 上报等）
#[derive(Debug, Clone, Deserialize)]
pub struct CodeResp {
    #[serde(default)]
    pub code: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginResp {
    #[serde(default)]
    pub code: i64,
    pub profile: Option<ProfileDto>,
    pub account: Option<AccountDto>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileDto {
    #[serde(rename = "userId", default)]
    pub user_id: i64,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountDto {
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserPlaylistResp {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub playlist: Vec<PlaylistDto>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "trackCount", default)]
    pub track_count: i64,
    pub creator: Option<ProfileDto>,
}

impl PlaylistDto {
    pub fn into_meta(self) -> PlaylistMeta {
        PlaylistMeta {
            id: self.id,
            name: self.name,
            track_count: self.track_count,
            creator: self.creator.map(|c| UserInfo {
                id: c.user_id,
                nickname: c.nickname,
            }),
            tracks: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListDetailResp {
    #[serde(default)]
    pub code: i64,
    pub playlist: Option<PlaylistDetailDto>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistDetailDto {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "trackCount", default)]
    pub track_count: i64,
    #[serde(default)]
    pub tracks: Vec<TrackDto>,
}

#[derive(Debug, Deserialize)]
pub struct TrackDto {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ar: Vec<ArtistDto>,
    #[serde(default)]
    pub artists: Vec<ArtistDto>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistDto {
    #[serde(default)]
    pub name: String,
}

impl TrackDto {
    /// 两代接口的歌手字段名不同（`ar` / `artists`），统一拼成斜杠分隔
    pub fn into_track(self) -> Track {
        let artists = if !self.ar.is_empty() {
            self.ar
        } else {
            self.artists
        };
        let artists = artists
            .into_iter()
            .map(|a| a.name)
            .collect::<Vec<_>>()
            .join("/");
        Track {
            id: self.id,
            name: self.name,
            artists,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MusicUrlResp {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub data: Vec<SongUrlItem>,
}

#[derive(Debug, Deserialize)]
pub struct SongUrlItem {
    pub id: i64,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayRecordResp {
    #[serde(default)]
    pub code: i64,
    #[serde(rename = "allData", default)]
    pub all_data: Vec<RecordItem>,
}

#[derive(Debug, Deserialize)]
pub struct RecordItem {
    #[serde(rename = "playCount", default)]
    pub play_count: i64,
    #[serde(default)]
    pub score: i64,
    pub song: Option<TrackDto>,
}

#[derive(Debug, Deserialize)]
pub struct DailySuggestionsResp {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub recommend: Vec<TrackDto>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsResp {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
}

#[derive(Debug, Deserialize)]
pub struct CommentDto {
    #[serde(default)]
    pub content: String,
    #[serde(rename = "likedCount", default)]
    pub liked_count: i64,
    pub user: Option<CommentUserDto>,
}

#[derive(Debug, Deserialize)]
pub struct CommentUserDto {
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct LyricResp {
    #[serde(default)]
    pub code: i64,
    pub lrc: Option<LyricBlock>,
    pub tlyric: Option<LyricBlock>,
    #[serde(rename = "lyricUser")]
    pub lyric_user: Option<LyricContributor>,
    #[serde(rename = "transUser")]
    pub trans_user: Option<LyricContributor>,
}

/// 歌词 blob 自带版本号，version 为 0 视为无内容
#[derive(Debug, Deserialize)]
pub struct LyricBlock {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub lyric: String,
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct LyricContributor {
    #[serde(default)]
    pub nickname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_dto_prefers_ar() {
        let t: TrackDto = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "歌", "ar": [{"name": "甲"}, {"name": "乙"}],
            "artists": [{"name": "忽略"}]
        }))
        .unwrap();
        assert_eq!(t.into_track().artists, "甲/乙");
    }

    #[test]
    fn test_track_dto_falls_back_to_artists() {
        let t: TrackDto = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "歌", "artists": [{"name": "丙"}]
        }))
        .unwrap();
        assert_eq!(t.into_track().artists, "丙");
    }

    #[test]
    fn test_playlist_dto_into_meta() {
        let p: PlaylistDto = serde_json::from_value(serde_json::json!({
            "id": 9, "name": "我喜欢的音乐", "trackCount": 3,
            "creator": {"userId": 7, "nickname": "某人"}
        }))
        .unwrap();
        let meta = p.into_meta();
        assert_eq!(meta.id, 9);
        assert_eq!(meta.track_count, 3);
        assert_eq!(meta.creator.unwrap().id, 7);
        assert!(meta.tracks.is_empty());
    }
}
