//! 位姿来源接口
//!
//! 位姿由外部坐标变换服务提供，查询可能失败或超时。

use crate::error::MotionError;
use crate::types::Pose;
use std::time::Duration;

/// 位姿来源
pub trait PoseSource: Send + Sync {
    /// 查询机器人最新位姿
    ///
    /// 最多阻塞 `timeout`。变换不可用时返回 [`MotionError::PoseUnavailable`]。
    fn lookup(&self, timeout: Duration) -> Result<Pose, MotionError>;
}
