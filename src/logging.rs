//! tracing 初始化：非阻塞滚动文件输出 + EnvFilter

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// 持有 appender 的 flush guard，drop 时落盘
pub struct LogGuard(#[allow(dead_code)] WorkerGuard);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
}

pub fn init(data_dir: &Path, cfg: LogConfig) -> LogGuard {
    let preferred = cfg.dir.unwrap_or_else(|| data_dir.join("logs"));
    let log_dir = if fs::create_dir_all(&preferred).is_ok() {
        preferred
    } else {
        let fallback = std::env::temp_dir().join("ncm-core-logs");
        let _ = fs::create_dir_all(&fallback);
        fallback
    };

    let appender = tracing_appender::rolling::daily(&log_dir, "ncm-core.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = cfg
        .filter
        .filter(|s| !s.trim().is_empty())
        .map(EnvFilter::new)
        .unwrap_or_else(|| {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"))
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
        .try_init();

    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");
    LogGuard(guard)
}
