use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub name: String,
    pub artists: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub nickname: String,
}

#[derive(Debug, Default, Clone)]
pub struct PlaylistMeta {
    pub id: i64,
    pub name: String,
    pub track_count: i64,
    pub creator: Option<UserInfo>,
    /// 歌单完整曲目，仅在拉取过 detail 之后填充
    pub tracks: Vec<Track>,
}

/// 请求播放链接时的目标：单曲或批量
///
/// 原接口同时接受数字与数组，这里收敛为显式的枚举。
#[derive(Debug, Clone)]
pub enum SongIds {
    One(i64),
    Many(Vec<i64>),
}

impl SongIds {
    pub fn into_vec(self) -> Vec<i64> {
        match self {
            SongIds::One(id) => vec![id],
            SongIds::Many(ids) => ids,
        }
    }
}

impl From<i64> for SongIds {
    fn from(id: i64) -> Self {
        SongIds::One(id)
    }
}

impl From<Vec<i64>> for SongIds {
    fn from(ids: Vec<i64>) -> Self {
        SongIds::Many(ids)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    High,
    Medium,
    Low,
}

impl Quality {
    /// 对应服务端 `br` 参数的码率
    pub fn bitrate(self) -> i64 {
        match self {
            Quality::High => 320_000,
            Quality::Medium => 160_000,
            Quality::Low => 96_000,
        }
    }
}
