use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ncm-core",
    version,
    about = "网易云音乐 API 接入与状态层（自测 CLI）"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 覆盖数据目录（默认走系统 data_local_dir）
    #[arg(long, env = "NCM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// 覆盖日志目录（默认 `{data_dir}/logs`）
    #[arg(long, env = "NCM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// 覆盖日志过滤（等价于设置 RUST_LOG）
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,

    /// 覆盖服务 domain（默认 http://music.163.com）
    #[arg(long, env = "NCM_DOMAIN")]
    pub domain: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 账号登录并持久化会话
    Login {
        account: String,
        password: String,
    },

    /// 用持久化的 user+cookie 恢复会话并打印歌单
    Restore,

    /// 拉取一首歌的歌词（含翻译合并）并打印
    Lyric {
        id: i64,
    },

    /// 拉取一首歌的播放链接
    Url {
        id: i64,
    },
}
