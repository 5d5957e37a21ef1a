//! 导航动作服务接口
//!
//! 导航服务在调用方控制流之外异步回调两类通知：
//! - **Active**: 服务开始追踪某个目标（仅供参考）
//! - **Terminal**: 目标终止（成功、中止或其他）
//!
//! # 设计
//!
//! 回调不直接修改控制器状态，而是通过 [`GoalEventSender`] 投递到通道，
//! 由 `RobotMotionController` 在自身的同步路径中消费。
//! 每个事件都携带 [`GoalId`]，过期目标的回调在消费时被丢弃。
//!
//! ```text
//! 导航服务线程 ──try_send──▶ [GoalEvent 通道] ──drain──▶ 控制器（Mutex 内更新）
//! ```

use crate::error::MotionError;
use crate::types::{GoalId, Pose, TerminalState};
use crossbeam_channel::{Sender, TrySendError};
use std::time::Duration;
use tracing::warn;

/// 导航服务回调事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalEvent {
    /// 服务开始追踪目标
    Active { goal_id: GoalId },
    /// 目标终止
    Terminal {
        goal_id: GoalId,
        state: TerminalState,
    },
}

impl GoalEvent {
    /// 事件对应的目标序号
    pub fn goal_id(&self) -> GoalId {
        match self {
            GoalEvent::Active { goal_id } | GoalEvent::Terminal { goal_id, .. } => *goal_id,
        }
    }
}

/// 回调事件发送端
///
/// 绑定到单个目标。可以克隆并移动到任意线程，发送是非阻塞的。
#[derive(Debug, Clone)]
pub struct GoalEventSender {
    goal_id: GoalId,
    tx: Sender<GoalEvent>,
}

impl GoalEventSender {
    pub(crate) fn new(goal_id: GoalId, tx: Sender<GoalEvent>) -> Self {
        Self { goal_id, tx }
    }

    /// 绑定的目标序号
    pub fn goal_id(&self) -> GoalId {
        self.goal_id
    }

    /// 通知：服务开始追踪目标
    pub fn active(&self) {
        self.emit(GoalEvent::Active {
            goal_id: self.goal_id,
        });
    }

    /// 通知：目标终止
    pub fn done(&self, state: TerminalState) {
        self.emit(GoalEvent::Terminal {
            goal_id: self.goal_id,
            state,
        });
    }

    fn emit(&self, event: GoalEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {},
            // 控制器已销毁，事件无人消费
            Err(TrySendError::Disconnected(_)) => {},
            Err(TrySendError::Full(_)) => {
                warn!("Goal event channel full, dropping {:?}", event);
            },
        }
    }
}

/// 导航动作服务客户端
///
/// 路径规划、避障和底层运动控制全部由服务负责。
pub trait NavigationActionClient: Send + Sync {
    /// 等待服务可用
    ///
    /// 超时内服务可用返回 `true`。
    fn wait_for_server(&self, timeout: Duration) -> bool;

    /// 异步发送目标
    ///
    /// 服务接受请求后立即返回，不等待目标完成。
    /// 后续的 Active/Terminal 通知通过 `events` 投递。
    fn send_goal(&self, goal: &Pose, events: GoalEventSender) -> Result<(), MotionError>;

    /// 请求取消目标（尽力而为）
    fn cancel_goal(&self, goal_id: GoalId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};

    #[test]
    fn test_sender_tags_events_with_goal_id() {
        let (tx, rx) = unbounded();
        let sender = GoalEventSender::new(GoalId(3), tx);

        sender.active();
        sender.done(TerminalState::Aborted);

        assert_eq!(rx.try_recv(), Ok(GoalEvent::Active { goal_id: GoalId(3) }));
        let terminal = rx.try_recv().unwrap();
        assert_eq!(terminal.goal_id(), GoalId(3));
        assert_eq!(
            terminal,
            GoalEvent::Terminal {
                goal_id: GoalId(3),
                state: TerminalState::Aborted
            }
        );
    }

    #[test]
    fn test_sender_survives_dropped_receiver() {
        let (tx, rx) = unbounded();
        let sender = GoalEventSender::new(GoalId(1), tx);
        drop(rx);

        // 不应 panic
        sender.done(TerminalState::Succeeded);
    }

    #[test]
    fn test_sender_drops_when_full() {
        let (tx, rx) = bounded(1);
        let sender = GoalEventSender::new(GoalId(1), tx);

        sender.active();
        sender.done(TerminalState::Succeeded);

        assert_eq!(rx.len(), 1);
    }
}
