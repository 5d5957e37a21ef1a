//! 运动状态只读视图
//!
//! 原因只需要读取位姿、当前目标和运动状态，不需要下发目标。

use cam_motion::{GoalId, MotionStatus, Pose, RobotMotionController};

/// 运动状态只读视图
pub trait MotionState: Send + Sync {
    /// 最近一次刷新的位姿
    fn pose(&self) -> Pose;
    /// 最近一次成功发送的目标
    fn current_goal(&self) -> Pose;
    /// 当前跟踪的目标序号（重新下发同一位置也会变化）
    fn current_goal_id(&self) -> GoalId;
    /// 当前运动状态
    fn status(&self) -> MotionStatus;
}

impl MotionState for RobotMotionController {
    fn pose(&self) -> Pose {
        RobotMotionController::pose(self)
    }

    fn current_goal(&self) -> Pose {
        RobotMotionController::current_goal(self)
    }

    fn current_goal_id(&self) -> GoalId {
        RobotMotionController::current_goal_id(self)
    }

    fn status(&self) -> MotionStatus {
        RobotMotionController::status(self)
    }
}
