use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_LEVEL: &str = "info";

/// トレースの初期化（`RUST_LOG` 未設定時は info）
///
/// 標準出力はカートリンクの出力に使うため、ログは標準エラーに書く。
/// 2回目以降の呼び出しは何もしない。
pub fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
