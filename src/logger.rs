use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// `default_level` 来自配置文件的 `[log] level`，
/// RUST_LOG 环境变量优先于配置
///
/// 示例:
/// - RUST_LOG=debug diagrun selfcheck
/// - RUST_LOG=diagrun::runner=trace diagrun selfcheck
pub fn init_logger(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 日志写到 stderr，stdout 留给报告输出（json 模式下可直接管道处理）
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    tracing::debug!("Logger initialized");
}
