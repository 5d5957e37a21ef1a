//! 日志初始化
//!
//! 安装 `tracing-subscriber` fmt 输出，并把 `log` crate 的记录桥接到 `tracing`。
//! 未设置 `RUST_LOG` 时使用给定的默认指令。重复调用无副作用。

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// 使用默认级别 `info` 初始化
pub fn init() {
    init_with_default("info");
}

/// 使用给定的默认过滤指令初始化（如 `"cam_exploration=debug,info"`）
pub fn init_with_default(directive: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

        // 其他库可能已安装全局 subscriber，此时保留它们
        let _ = tracing_log::LogTracer::init();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
