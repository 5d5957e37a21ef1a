//! 运动层模块
//!
//! 本模块负责探索机器人与导航动作服务之间的交互，包括：
//! - 目标下发与取消
//! - 异步完成回调的同步化（事件通道 + 目标序号过滤）
//! - 位姿缓存（ArcSwap 快照，读取无锁）
//!
//! 路径规划、避障和底层电机控制全部委托给导航服务。

pub mod action;
mod config;
mod controller;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pose_source;
pub mod types;

pub use action::{GoalEvent, GoalEventSender, NavigationActionClient};
pub use config::MotionConfig;
pub use controller::RobotMotionController;
pub use error::MotionError;
pub use pose_source::PoseSource;
pub use types::{GoalId, MotionStatus, Point, Pose, Quaternion, TerminalState};
