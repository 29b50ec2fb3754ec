//! 日志初始化
//!
//! 默认 `info` 级别，可用 `RUST_LOG` 覆盖

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 多次调用是安全的，后面的调用不生效
///
/// # 参数
/// - `verbose`: 为 `true` 时默认级别提升到 `debug`
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
