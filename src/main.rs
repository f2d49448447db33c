use clap::Parser;

use ncm_core::cli::{Cli, Command};
use ncm_core::domain::{Quality, SongIds};
use ncm_core::error::AppError;
use ncm_core::netease::{NcmClient, NcmClientConfig, Session};
use ncm_core::storage::FileStorage;
use ncm_core::store::actions;
use ncm_core::store::state::AppState;
use ncm_core::{logging, storage::KvStorage as _};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(FileStorage::default_data_dir);

    let mut cfg = NcmClientConfig::default();
    if let Some(v) = cli.domain.clone() {
        cfg.domain = v;
    }

    let _log_guard = logging::init(
        &data_dir,
        logging::LogConfig {
            dir: cli.log_dir.clone(),
            filter: cli.log_filter.clone(),
        },
    );
    tracing::info!(data_dir = %data_dir.display(), "ncm-core 启动");

    let client = NcmClient::new(cfg)?;
    let mut storage = FileStorage::open(&data_dir)?;
    let mut state = AppState::default();
    let mut session = storage
        .get("cookie")
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_else(Session::new);

    match cli.command {
        Command::Login { account, password } => {
            let resp = actions::login(
                &mut state,
                &mut session,
                &client,
                &mut storage,
                &account,
                &password,
            )
            .await?;
            if resp.code == 200 {
                println!("登录成功: {} (uid={})", state.user.nickname, state.user.id);
                println!("歌单 {} 张", state.user_playlists.len());
            } else {
                println!("登录失败: code={}", resp.code);
            }
        }
        Command::Restore => {
            let ok =
                actions::restore_user(&mut state, &mut session, &client, &mut storage).await?;
            if !ok {
                println!("没有可恢复的会话，或校验未通过");
                return Ok(());
            }
            println!("会话有效: {} (uid={})", state.user.nickname, state.user.id);
            for p in &state.user_playlists {
                println!("  [{}] {} ({} 首)", p.id, p.name, p.track_count);
            }
        }
        Command::Lyric { id } => {
            let lyric = client.music_lyric(&mut session, id).await?;
            match (&lyric.mlrc, &lyric.lrc) {
                (Some(mlrc), _) => {
                    println!("双语歌词 {} 行:", mlrc.lines.len());
                    for line in &mlrc.lines {
                        match &line.trans {
                            Some(t) => println!("[{:>8}ms] {} / {}", line.time_ms, line.content, t),
                            None => println!("[{:>8}ms] {}", line.time_ms, line.content),
                        }
                    }
                }
                (None, Some(lrc)) => {
                    println!("歌词 {} 行:", lrc.lines.len());
                    for line in &lrc.lines {
                        println!("[{:>8}ms] {}", line.time_ms, line.content);
                    }
                }
                (None, None) => println!("该曲目没有歌词"),
            }
        }
        Command::Url { id } => {
            let resp = client
                .music_url(&mut session, SongIds::One(id), Quality::High)
                .await?;
            if resp.code != 200 {
                println!("获取失败: code={}", resp.code);
                return Ok(());
            }
            match resp.data.into_iter().next().and_then(|it| it.url) {
                Some(url) => println!("{url}"),
                None => println!("无可用播放链接（可能需要登录或无版权）"),
            }
        }
    }

    Ok(())
}
