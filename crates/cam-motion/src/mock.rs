//! 测试替身（Mock）
//!
//! 无需真实导航服务和坐标变换即可驱动 [`RobotMotionController`](crate::RobotMotionController)。
//! 测试可以为任意目标序号手动触发 Active/Terminal 回调。

use crate::action::{GoalEventSender, NavigationActionClient};
use crate::error::MotionError;
use crate::pose_source::PoseSource;
use crate::types::{GoalId, Pose, TerminalState};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Mock 导航服务
#[derive(Debug)]
pub struct MockNavigationClient {
    reachable: AtomicBool,
    reject_goals: AtomicBool,
    sent: Mutex<Vec<(GoalId, Pose)>>,
    cancelled: Mutex<Vec<GoalId>>,
    senders: Mutex<HashMap<GoalId, GoalEventSender>>,
}

impl Default for MockNavigationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNavigationClient {
    pub fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            reject_goals: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// 设置 `wait_for_server` 的结果
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }

    /// 拒绝后续所有目标
    pub fn set_reject_goals(&self, reject: bool) {
        self.reject_goals.store(reject, Ordering::Release);
    }

    /// 已接受的目标（按发送顺序）
    pub fn sent_goals(&self) -> Vec<(GoalId, Pose)> {
        self.sent.lock().clone()
    }

    /// 收到的取消请求
    pub fn cancelled_goals(&self) -> Vec<GoalId> {
        self.cancelled.lock().clone()
    }

    /// 触发 Active 回调
    ///
    /// 目标未被接受过时返回 `false`。
    pub fn fire_active(&self, goal_id: GoalId) -> bool {
        match self.senders.lock().get(&goal_id) {
            Some(sender) => {
                sender.active();
                true
            },
            None => false,
        }
    }

    /// 触发 Terminal 回调
    pub fn fire_terminal(&self, goal_id: GoalId, state: TerminalState) -> bool {
        match self.senders.lock().get(&goal_id) {
            Some(sender) => {
                sender.done(state);
                true
            },
            None => false,
        }
    }
}

impl NavigationActionClient for MockNavigationClient {
    fn wait_for_server(&self, _timeout: Duration) -> bool {
        self.reachable.load(Ordering::Acquire)
    }

    fn send_goal(&self, goal: &Pose, events: GoalEventSender) -> Result<(), MotionError> {
        if self.reject_goals.load(Ordering::Acquire) {
            return Err(MotionError::GoalRejected("mock rejects goals".to_string()));
        }
        let goal_id = events.goal_id();
        self.sent.lock().push((goal_id, *goal));
        self.senders.lock().insert(goal_id, events);
        Ok(())
    }

    fn cancel_goal(&self, goal_id: GoalId) {
        self.cancelled.lock().push(goal_id);
    }
}

/// Mock 位姿来源
#[derive(Debug)]
pub struct MockPoseSource {
    pose: Mutex<Pose>,
    failing: AtomicBool,
    lookups: AtomicU64,
}

impl MockPoseSource {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose: Mutex::new(pose),
            failing: AtomicBool::new(false),
            lookups: AtomicU64::new(0),
        }
    }

    pub fn set_pose(&self, pose: Pose) {
        *self.pose.lock() = pose;
    }

    /// 模拟坐标变换不可用
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// 查询次数
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl PoseSource for MockPoseSource {
    fn lookup(&self, _timeout: Duration) -> Result<Pose, MotionError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Acquire) {
            return Err(MotionError::PoseUnavailable(
                "mock transform unavailable".to_string(),
            ));
        }
        Ok(*self.pose.lock())
    }
}
