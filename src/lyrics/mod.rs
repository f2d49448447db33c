pub mod lrc;
mod merge;

pub use merge::merge;

use std::collections::BTreeMap;

use crate::netease::dto::LyricContributor;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LyricLine {
    /// 距曲目起点的单调偏移（毫秒）
    pub time_ms: u64,
    pub content: String,
}

/// 解析后的单条歌词轨，行按 time_ms 升序
#[derive(Debug, Default, Clone)]
pub struct Lrc {
    pub info: BTreeMap<String, String>,
    pub lines: Vec<LyricLine>,
}

#[derive(Debug, Default, Clone)]
pub struct MergedLine {
    pub time_ms: u64,
    pub content: String,
    pub trans: Option<String>,
}

/// 合并后的双语歌词，构建一次后不再变动
#[derive(Debug, Default, Clone)]
pub struct MergedLyric {
    pub info: BTreeMap<String, String>,
    pub trans_info: BTreeMap<String, String>,
    pub lines: Vec<MergedLine>,
}

/// 单曲歌词的完整拉取结果
#[derive(Debug, Default, Clone)]
pub struct TrackLyric {
    pub lyric_user: Option<LyricContributor>,
    pub trans_user: Option<LyricContributor>,
    pub lrc: Option<Lrc>,
    pub mlrc: Option<MergedLyric>,
}
