//! 运动控制器配置

use std::time::Duration;

/// 运动控制器配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// 启动时等待导航服务的最长时间
    pub server_timeout: Duration,
    /// 单次位姿查询的超时
    pub pose_timeout: Duration,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            server_timeout: Duration::from_secs(5),
            pose_timeout: Duration::from_millis(200),
        }
    }
}
