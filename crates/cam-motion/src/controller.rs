//! 机器人运动控制器
//!
//! 向导航动作服务下发目标，并跟踪其异步完成情况。
//!
//! # 共享状态
//!
//! ```text
//! ┌──────────────────────────┐
//! │  RobotMotionController   │
//! ├──────────────────────────┤
//! │ pose        │ ArcSwap<PoseSnapshot>  ← refresh_pose() 整体替换
//! │ goal        │ Mutex<GoalState>       ← go_to / 回调事件
//! │ event_rx    │ Receiver<GoalEvent>    ← 导航服务线程投递
//! └──────────────────────────┘
//! ```
//!
//! 回调事件在控制器的读写路径中、持有 `goal` 锁时被消费，
//! 所以状态的所有修改都遵循同一把锁。
//!
//! `go_to` 调用导航服务时不持有锁：先在锁内分配新序号，
//! 发送返回后再回到锁内提交结果。发送期间到达的新目标事件先暂存，
//! 提交 `Moving` 之后按到达顺序应用。

use crate::action::{GoalEvent, GoalEventSender, NavigationActionClient};
use crate::config::MotionConfig;
use crate::error::MotionError;
use crate::pose_source::PoseSource;
use crate::types::{GoalId, MotionStatus, Point, Pose};
use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, error, info, trace, warn};

/// 位姿快照（当前值 + 上一次刷新前的值）
#[derive(Debug, Clone, Copy, Default)]
struct PoseSnapshot {
    current: Pose,
    previous: Pose,
}

/// 目标状态（受 Mutex 保护）
#[derive(Debug)]
struct GoalState {
    /// 最近一次成功发送的目标
    goal: Pose,
    /// 当前跟踪的目标序号（最后一次发送尝试）
    goal_id: GoalId,
    status: MotionStatus,
    /// `goal_id` 的发送请求尚未返回
    sending: bool,
    /// 发送返回前就到达的本目标事件，发送成功后按序应用
    deferred: Vec<GoalEvent>,
}

/// 机器人运动控制器
///
/// 由探索循环显式持有，通过 `Arc` 共享给策略引擎等协作者。
/// 所有方法都只需要 `&self`。
pub struct RobotMotionController {
    client: Arc<dyn NavigationActionClient>,
    pose_source: Arc<dyn PoseSource>,
    config: MotionConfig,
    initialised: AtomicBool,
    pose: ArcSwap<PoseSnapshot>,
    goal: Mutex<GoalState>,
    event_tx: Sender<GoalEvent>,
    event_rx: Receiver<GoalEvent>,
    goals_sent: AtomicU64,
    goals_reached: AtomicU64,
}

impl RobotMotionController {
    /// 创建控制器（使用默认配置）
    ///
    /// 在下发任何目标之前必须调用一次 [`init`](Self::init)。
    pub fn new(
        client: Arc<dyn NavigationActionClient>,
        pose_source: Arc<dyn PoseSource>,
    ) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            client,
            pose_source,
            config: MotionConfig::default(),
            initialised: AtomicBool::new(false),
            pose: ArcSwap::from_pointee(PoseSnapshot::default()),
            // 初始视为已停在原点
            goal: Mutex::new(GoalState {
                goal: Pose::default(),
                goal_id: GoalId::default(),
                status: MotionStatus::Succeeded,
                sending: false,
                deferred: Vec::new(),
            }),
            event_tx,
            event_rx,
            goals_sent: AtomicU64::new(0),
            goals_reached: AtomicU64::new(0),
        }
    }

    /// 替换配置
    pub fn with_config(mut self, config: MotionConfig) -> Self {
        self.config = config;
        self
    }

    /// 当前配置
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// 连接导航服务
    ///
    /// 只能成功调用一次。启动超时内服务不可用时返回
    /// [`MotionError::ServerUnavailable`]，调用方应视为致命错误。
    pub fn init(&self) -> Result<(), MotionError> {
        if self.initialised.load(Ordering::Acquire) {
            return Err(MotionError::AlreadyInitialised);
        }

        info!("Waiting for the navigation action server");
        if !self.client.wait_for_server(self.config.server_timeout) {
            error!(
                "Navigation action server not available after {:?}",
                self.config.server_timeout
            );
            return Err(MotionError::ServerUnavailable(self.config.server_timeout));
        }

        if self
            .initialised
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(MotionError::AlreadyInitialised);
        }
        info!("Navigation action server connected");

        if !self.refresh_pose() {
            warn!("Initial pose not available yet");
        }
        Ok(())
    }

    /// 是否已初始化
    pub fn is_initialised(&self) -> bool {
        self.initialised.load(Ordering::Acquire)
    }

    // ==================== 目标管理 ====================

    /// 异步发送新目标
    ///
    /// 服务接受请求时返回 `true`，状态变为 `Moving` 并替换当前目标。
    /// 发送失败时状态变为 `Error` 并返回 `false`。不等待目标完成。
    ///
    /// 调用导航服务期间不持有状态锁，其他线程的状态查询不会被阻塞。
    pub fn go_to(&self, goal: Pose) -> bool {
        if !self.is_initialised() {
            error!("go_to called before init: {}", MotionError::NotInitialised);
            return false;
        }

        let goal_id = {
            let mut state = self.goal.lock();
            self.apply_pending_events(&mut state);

            // 先切换跟踪序号，上一目标的迟到回调从此被丢弃
            let goal_id = state.goal_id.next();
            state.goal_id = goal_id;
            state.sending = true;
            state.deferred.clear();
            goal_id
        };

        let events = GoalEventSender::new(goal_id, self.event_tx.clone());
        let result = self.client.send_goal(&goal, events);

        let mut state = self.goal.lock();
        // 发送期间已有更新的 go_to，本次结果不再影响状态
        let current = state.goal_id == goal_id;
        if current {
            state.sending = false;
        }

        match result {
            Ok(()) => {
                let sent = self.goals_sent.fetch_add(1, Ordering::Relaxed) + 1;
                info!(
                    "Goal {} sent: ({:.2}, {:.2}), {} goals sent so far",
                    goal_id, goal.position.x, goal.position.y, sent
                );
                if current {
                    state.goal = goal;
                    state.status = MotionStatus::Moving;
                    for event in std::mem::take(&mut state.deferred) {
                        self.apply_event(&mut state, event);
                    }
                } else {
                    debug!("Goal {} superseded while sending", goal_id);
                }
                true
            },
            Err(e) => {
                warn!("Failed to send goal {}: {}", goal_id, e);
                if current {
                    state.status = MotionStatus::Error;
                    state.deferred.clear();
                }
                false
            },
        }
    }

    /// 请求取消当前目标
    ///
    /// 尽力而为，不修改状态。被取消目标的终止回调仍可能到达，
    /// 若此时已下发新目标则被丢弃。
    pub fn cancel_goal(&self) {
        let goal_id = self.goal.lock().goal_id;
        debug!("Cancelling goal {}", goal_id);
        self.client.cancel_goal(goal_id);
    }

    /// 最近一次成功发送的目标
    pub fn current_goal(&self) -> Pose {
        let mut state = self.goal.lock();
        self.apply_pending_events(&mut state);
        state.goal
    }

    /// 当前跟踪的目标序号
    pub fn current_goal_id(&self) -> GoalId {
        self.goal.lock().goal_id
    }

    // ==================== 状态查询 ====================

    /// 当前运动状态
    pub fn status(&self) -> MotionStatus {
        let mut state = self.goal.lock();
        self.apply_pending_events(&mut state);
        state.status
    }

    /// 是否正在前往目标
    pub fn is_moving(&self) -> bool {
        self.status() == MotionStatus::Moving
    }

    /// 消费所有待处理的回调事件
    ///
    /// 状态查询会自动调用，探索循环也可以显式调用。返回处理的事件数。
    pub fn process_events(&self) -> usize {
        let mut state = self.goal.lock();
        self.apply_pending_events(&mut state)
    }

    /// 已发送的目标数
    pub fn goals_sent(&self) -> u64 {
        self.goals_sent.load(Ordering::Relaxed)
    }

    /// 已到达的目标数
    pub fn goals_reached(&self) -> u64 {
        self.goals_reached.load(Ordering::Relaxed)
    }

    // ==================== 位姿 ====================

    /// 最近一次刷新的位姿
    pub fn pose(&self) -> Pose {
        self.pose.load().current
    }

    /// 最近一次刷新的位置
    pub fn position(&self) -> Point {
        self.pose.load().current.position
    }

    /// 上一次刷新前的位姿
    pub fn previous_pose(&self) -> Pose {
        self.pose.load().previous
    }

    /// 刷新位姿
    ///
    /// 查询失败时返回 `false`，缓存的位姿保持不变。
    /// 最多阻塞 `MotionConfig::pose_timeout`。
    pub fn refresh_pose(&self) -> bool {
        match self.pose_source.lookup(self.config.pose_timeout) {
            Ok(pose) => {
                // 只有控制循环写入位姿，rcu 保证读者看到完整快照
                self.pose.rcu(|old| PoseSnapshot {
                    current: pose,
                    previous: old.current,
                });
                trace!(
                    "Pose refreshed: ({:.3}, {:.3})",
                    pose.position.x, pose.position.y
                );
                true
            },
            Err(e) => {
                warn!("Failed to refresh robot pose: {}", e);
                false
            },
        }
    }

    // ==================== 回调处理 ====================

    fn apply_pending_events(&self, state: &mut GoalState) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            applied += 1;
            self.apply_event(state, event);
        }
        applied
    }

    fn apply_event(&self, state: &mut GoalState, event: GoalEvent) {
        if event.goal_id() != state.goal_id {
            debug!(
                "Discarding stale {:?} (tracking goal {})",
                event, state.goal_id
            );
            return;
        }
        if state.sending {
            trace!("Deferring {:?} until goal {} is sent", event, state.goal_id);
            state.deferred.push(event);
            return;
        }

        match event {
            GoalEvent::Active { goal_id } => {
                debug!("Goal {} is now active", goal_id);
            },
            GoalEvent::Terminal { goal_id, state: terminal } => {
                state.status = terminal.to_status();
                if state.status == MotionStatus::Succeeded {
                    let reached = self.goals_reached.fetch_add(1, Ordering::Relaxed) + 1;
                    info!("Goal {} reached ({} goals reached)", goal_id, reached);
                } else {
                    info!("Goal {} finished with {:?}", goal_id, terminal);
                }
            },
        }
    }
}
