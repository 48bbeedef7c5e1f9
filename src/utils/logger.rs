use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "solar_estimator=info";
const VERBOSE_DIRECTIVE: &str = "solar_estimator=debug,info";

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// CLI 日誌寫到 stderr，stdout 保留給估算結果 (JSON/CSV 可直接 pipe)
pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter(VERBOSE_DIRECTIVE)
    } else {
        env_filter(DEFAULT_DIRECTIVE)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVE))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time() // CloudWatch 自帶時間戳
                .json()
                .flatten_event(true),
        )
        .init();
}
