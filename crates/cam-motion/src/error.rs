//! 运动层错误类型定义

use std::time::Duration;
use thiserror::Error;

/// 运动层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// 尚未调用 `init()`
    #[error("Motion controller not initialised")]
    NotInitialised,

    /// `init()` 只能调用一次
    #[error("Motion controller already initialised")]
    AlreadyInitialised,

    /// 启动超时内未能连接导航服务
    #[error("Navigation server unavailable after {0:?}")]
    ServerUnavailable(Duration),

    /// 导航服务拒绝了目标
    #[error("Goal rejected: {0}")]
    GoalRejected(String),

    /// 位姿查询失败（如坐标变换不可用）
    #[error("Pose unavailable: {0}")]
    PoseUnavailable(String),
}
