//! 单元测试共用的替身

use crate::map::{CellId, MapQueryService};
use crate::motion_state::MotionState;
use crate::visualization::{Rgba, VisualizationSink};
use cam_motion::{GoalId, MotionStatus, Point, Pose};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 可手动设置的运动状态
pub(crate) struct StubMotion {
    pose: Mutex<Pose>,
    goal: Mutex<(GoalId, Pose)>,
    status: Mutex<MotionStatus>,
}

impl StubMotion {
    pub(crate) fn new(pose: Pose, goal: Pose, status: MotionStatus) -> Self {
        Self {
            pose: Mutex::new(pose),
            goal: Mutex::new((GoalId::default(), goal)),
            status: Mutex::new(status),
        }
    }

    pub(crate) fn set_pose(&self, pose: Pose) {
        *self.pose.lock() = pose;
    }

    /// 下发新目标（序号递增，位置可以相同）
    pub(crate) fn set_goal(&self, goal: Pose) {
        let mut current = self.goal.lock();
        *current = (current.0.next(), goal);
    }

    pub(crate) fn set_status(&self, status: MotionStatus) {
        *self.status.lock() = status;
    }
}

impl MotionState for StubMotion {
    fn pose(&self) -> Pose {
        *self.pose.lock()
    }

    fn current_goal(&self) -> Pose {
        self.goal.lock().1
    }

    fn current_goal_id(&self) -> GoalId {
        self.goal.lock().0
    }

    fn status(&self) -> MotionStatus {
        *self.status.lock()
    }
}

/// 固定邻居集合的地图，记录前沿查询
pub(crate) struct StubMap {
    pub(crate) neighbours: Vec<CellId>,
    pub(crate) frontier: HashSet<CellId>,
    pub(crate) target: Point,
    pub(crate) frontier_queries: Mutex<Vec<CellId>>,
    pub(crate) last_depth: Mutex<Option<u32>>,
}

impl StubMap {
    pub(crate) fn new(neighbours: Vec<CellId>, frontier: &[CellId]) -> Self {
        Self {
            neighbours,
            frontier: frontier.iter().copied().collect(),
            target: Point::new(1.0, 1.0, 0.0),
            frontier_queries: Mutex::new(Vec::new()),
            last_depth: Mutex::new(None),
        }
    }
}

impl MapQueryService for StubMap {
    fn neighbours(&self, _point: &Point, depth: u32) -> Vec<CellId> {
        *self.last_depth.lock() = Some(depth);
        self.neighbours.clone()
    }

    fn is_frontier_cell(&self, cell: CellId) -> bool {
        self.frontier_queries.lock().push(cell);
        self.frontier.contains(&cell)
    }

    fn current_frontier_target_point(&self) -> Point {
        self.target
    }
}

/// 记录所有可视化调用
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) layers: Mutex<Vec<(String, String)>>,
    pub(crate) colors: Mutex<Vec<(String, Rgba)>>,
    pub(crate) published: Mutex<Vec<(String, Vec<CellId>)>>,
    pub(crate) publish_count: AtomicUsize,
}

impl VisualizationSink for RecordingSink {
    fn register_layer(&self, key: &str, label: &str) {
        self.layers.lock().push((key.to_string(), label.to_string()));
    }

    fn set_color(&self, key: &str, color: Rgba) {
        self.colors.lock().push((key.to_string(), color));
    }

    fn publish(&self, key: &str, cells: &[CellId]) {
        self.publish_count.fetch_add(1, Ordering::Relaxed);
        self.published.lock().push((key.to_string(), cells.to_vec()));
    }
}
