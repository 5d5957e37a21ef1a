//! 探索循环
//!
//! 每个控制周期：
//! 1. 刷新位姿
//! 2. 评估重规划策略（每个周期都评估，保持各原因的迟滞状态最新）
//! 3. 正在移动且需要重规划：取消当前目标，放弃该前沿，换下一个
//! 4. 没有在移动（到达或失败）：选择最近的前沿并下发
//!
//! 没有剩余前沿时报告 [`TickOutcome::Finished`]。

use crate::grid::GridMap;
use cam_motion::{MotionStatus, Pose, RobotMotionController};
use cam_replan::{CellId, ReplanPolicyEngine};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// 单个周期的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// 位姿不可用，本周期跳过
    PoseUnavailable,
    /// 继续前往当前目标
    Navigating,
    /// 上一个目标结束后下发了新目标
    GoalIssued(Pose),
    /// 因重规划放弃当前目标并下发了新目标
    Replanned(Pose),
    /// 导航服务拒绝了新目标
    SendFailed,
    /// 没有剩余前沿
    Finished,
}

/// 探索循环
pub struct Explorer {
    motion: Arc<RobotMotionController>,
    map: Arc<GridMap>,
    policy: ReplanPolicyEngine,
    /// 被放弃或失败的前沿栅格
    abandoned: HashSet<CellId>,
    goal_cell: Option<CellId>,
    replans: u64,
}

impl Explorer {
    pub fn new(
        motion: Arc<RobotMotionController>,
        map: Arc<GridMap>,
        policy: ReplanPolicyEngine,
    ) -> Self {
        Self {
            motion,
            map,
            policy,
            abandoned: HashSet::new(),
            goal_cell: None,
            replans: 0,
        }
    }

    /// 因策略触发而放弃目标的次数
    pub fn replans(&self) -> u64 {
        self.replans
    }

    /// 被放弃的前沿栅格数
    pub fn abandoned(&self) -> usize {
        self.abandoned.len()
    }

    /// 执行一个控制周期
    pub fn tick(&mut self) -> TickOutcome {
        if !self.motion.refresh_pose() {
            return TickOutcome::PoseUnavailable;
        }

        let status = self.motion.status();
        let replan = self.policy.replan();

        match status {
            MotionStatus::Moving if !replan => TickOutcome::Navigating,
            MotionStatus::Moving => {
                self.motion.cancel_goal();
                self.abandon_goal();
                self.replans += 1;
                match self.issue_next_goal() {
                    TickOutcome::GoalIssued(goal) => TickOutcome::Replanned(goal),
                    other => other,
                }
            },
            MotionStatus::Error => {
                self.abandon_goal();
                self.issue_next_goal()
            },
            MotionStatus::Succeeded => {
                self.goal_cell = None;
                self.issue_next_goal()
            },
        }
    }

    fn abandon_goal(&mut self) {
        if let Some(cell) = self.goal_cell.take() {
            self.abandoned.insert(cell);
        }
    }

    fn issue_next_goal(&mut self) -> TickOutcome {
        let position = self.motion.position();
        let Some(cell) = self.map.nearest_frontier(&position, &self.abandoned) else {
            info!(
                "No frontier left, exploration finished ({} goals reached)",
                self.motion.goals_reached()
            );
            return TickOutcome::Finished;
        };
        let Some(target) = self.map.cell_center(cell) else {
            return TickOutcome::Finished;
        };

        let yaw = (target.y - position.y).atan2(target.x - position.x);
        let goal = Pose::planar(target.x, target.y, yaw);
        self.map.set_frontier_target(target);

        if self.motion.go_to(goal) {
            self.goal_cell = Some(cell);
            TickOutcome::GoalIssued(goal)
        } else {
            warn!("Navigation refused frontier goal at ({:.2}, {:.2})", target.x, target.y);
            self.abandoned.insert(cell);
            TickOutcome::SendFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;
    use crate::sim::Simulation;
    use cam_motion::Point;
    use cam_motion::mock::{MockNavigationClient, MockPoseSource};
    use cam_replan::{CauseContext, MapQueryService, ReplanCause};
    use std::time::Duration;

    const HALLWAY: &str = "
        #########
        #...R...#
        #########
    ";

    struct Fixed(bool);

    impl ReplanCause for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn replan(&mut self) -> bool {
            self.0
        }
    }

    fn setup(world: &str, replan: bool) -> (Simulation, Arc<GridMap>, Explorer) {
        let sim = Simulation::from_ascii(world, 1.0).unwrap().with_speed(1.0);
        let map = Arc::new(sim.blank_map());
        let motion = Arc::new(RobotMotionController::new(
            Arc::new(sim.navigation()),
            Arc::new(sim.pose_source()),
        ));
        motion.init().unwrap();

        let mut policy = ReplanPolicyEngine::new(CauseContext::new(motion.clone(), map.clone()));
        policy.push_cause(Box::new(Fixed(replan)));
        let explorer = Explorer::new(motion, map.clone(), policy);
        (sim, map, explorer)
    }

    fn position(outcome: TickOutcome) -> (f64, f64) {
        match outcome {
            TickOutcome::GoalIssued(goal) | TickOutcome::Replanned(goal) => {
                (goal.position.x, goal.position.y)
            },
            other => panic!("expected a goal, got {:?}", other),
        }
    }

    #[test]
    fn test_first_tick_issues_nearest_frontier() {
        let (sim, map, mut explorer) = setup(HALLWAY, false);
        sim.sense(&map, 1.0);

        // 两侧前沿等距，取编号较小的左侧
        let first = explorer.tick();
        assert_eq!(position(first), (3.5, 1.5));
        assert_eq!(map.current_frontier_target_point(), Point::new(3.5, 1.5, 0.0));
        assert!(sim.has_active_goal());

        assert_eq!(explorer.tick(), TickOutcome::Navigating);
    }

    #[test]
    fn test_replan_abandons_current_frontier() {
        let (sim, map, mut explorer) = setup(HALLWAY, true);
        sim.sense(&map, 1.0);

        assert_eq!(position(explorer.tick()), (3.5, 1.5));
        let second = explorer.tick();
        assert!(matches!(second, TickOutcome::Replanned(_)));
        assert_eq!(position(second), (5.5, 1.5));
        assert_eq!(explorer.replans(), 1);
        assert_eq!(explorer.abandoned(), 1);

        // 所有前沿都被放弃
        assert_eq!(explorer.tick(), TickOutcome::Finished);
        assert_eq!(explorer.replans(), 2);
    }

    #[test]
    fn test_explores_whole_hallway() {
        let (sim, map, mut explorer) = setup(HALLWAY, false);

        let mut finished = false;
        for _ in 0..100 {
            sim.sense(&map, 1.0);
            if explorer.tick() == TickOutcome::Finished {
                finished = true;
                break;
            }
            sim.step(Duration::from_millis(500));
        }

        assert!(finished);
        assert!(map.frontier_cells().is_empty());
        for column in 1..8 {
            assert_eq!(map.state(9 + column), Some(CellState::Free));
        }
        assert_eq!(explorer.abandoned(), 0);
    }

    #[test]
    fn test_pose_unavailable_skips_tick() {
        let client = Arc::new(MockNavigationClient::new());
        let source = Arc::new(MockPoseSource::new(Pose::default()));
        let motion = Arc::new(RobotMotionController::new(client.clone(), source.clone()));
        motion.init().unwrap();
        source.set_failing(true);

        let map = Arc::new(GridMap::new(3, 3, 1.0, Point::default()));
        let policy = ReplanPolicyEngine::new(CauseContext::new(motion.clone(), map.clone()));
        let mut explorer = Explorer::new(motion, map, policy);

        assert_eq!(explorer.tick(), TickOutcome::PoseUnavailable);
        assert!(client.sent_goals().is_empty());
    }

    #[test]
    fn test_rejected_goal_is_abandoned() {
        let client = Arc::new(MockNavigationClient::new());
        client.set_reject_goals(true);
        let source = Arc::new(MockPoseSource::new(Pose::planar(0.5, 0.5, 0.0)));
        let motion = Arc::new(RobotMotionController::new(client.clone(), source));
        motion.init().unwrap();

        let map = Arc::new(GridMap::new(3, 1, 1.0, Point::default()));
        map.update([(0, CellState::Free), (1, CellState::Free)]);
        let policy = ReplanPolicyEngine::new(CauseContext::new(motion.clone(), map.clone()));
        let mut explorer = Explorer::new(motion, map, policy);

        assert_eq!(explorer.tick(), TickOutcome::SendFailed);
        assert_eq!(explorer.abandoned(), 1);
        // 发送失败后状态为 Error，继续尝试时已没有可用前沿
        assert_eq!(explorer.tick(), TickOutcome::Finished);
    }
}
