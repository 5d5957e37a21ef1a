//! 仿真导航服务
//!
//! 单步驱动的二维世界：
//! - 机器人以固定速度沿直线驶向当前目标
//! - 到达后报告 `Succeeded`，撞到障碍或目标不可达时报告 `Aborted`
//! - 新目标或取消请求会使旧目标 `Preempted`
//! - 传感器揭示机器人周围圆形范围内的真实栅格
//!
//! 世界由 ASCII 地图描述：`#` 障碍，`.` 空闲，`R` 机器人起点（空闲）。
//! 第一行对应 y 最大的一行。

use crate::grid::{CellState, GridMap};
use cam_motion::{
    GoalEventSender, GoalId, MotionError, NavigationActionClient, Point, Pose, PoseSource,
    TerminalState,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// 世界描述错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("World map is empty")]
    Empty,
    #[error("World rows have different widths (row {row})")]
    Ragged { row: usize },
    #[error("Unexpected character {ch:?} at row {row}, column {column}")]
    BadCell { ch: char, row: usize, column: usize },
    #[error("World map has no robot start 'R'")]
    NoStart,
}

struct ActiveGoal {
    goal: Pose,
    events: GoalEventSender,
}

struct World {
    width: usize,
    height: usize,
    resolution: f64,
    occupied: Vec<bool>,
    pose: Pose,
    speed: f64,
    active: Option<ActiveGoal>,
}

impl World {
    fn is_free(&self, point: &Point) -> bool {
        let cx = (point.x / self.resolution).floor();
        let cy = (point.y / self.resolution).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.width as f64 || cy >= self.height as f64 {
            return false;
        }
        !self.occupied[cy as usize * self.width + cx as usize]
    }

    fn finish(&mut self, state: TerminalState) {
        if let Some(active) = self.active.take() {
            debug!("Simulated goal {} finished: {:?}", active.events.goal_id(), state);
            active.events.done(state);
        }
    }
}

/// 仿真世界句柄
///
/// 克隆开销很小，所有克隆共享同一个世界。
#[derive(Clone)]
pub struct Simulation {
    world: Arc<Mutex<World>>,
}

impl Simulation {
    /// 默认移动速度（米/秒）
    pub const DEFAULT_SPEED: f64 = 0.5;

    /// 从 ASCII 地图创建世界，地图原点在左下角
    pub fn from_ascii(map: &str, resolution: f64) -> Result<Self, WorldError> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().map(|r| r.chars().count()).ok_or(WorldError::Empty)?;
        let height = rows.len();

        let mut occupied = vec![false; width * height];
        let mut start = None;
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(WorldError::Ragged { row });
            }
            let cy = height - 1 - row;
            for (column, ch) in line.chars().enumerate() {
                match ch {
                    '#' => occupied[cy * width + column] = true,
                    '.' => {},
                    'R' => start = Some((column, cy)),
                    _ => return Err(WorldError::BadCell { ch, row, column }),
                }
            }
        }
        let (sx, sy) = start.ok_or(WorldError::NoStart)?;

        Ok(Self {
            world: Arc::new(Mutex::new(World {
                width,
                height,
                resolution,
                occupied,
                pose: Pose::planar(
                    (sx as f64 + 0.5) * resolution,
                    (sy as f64 + 0.5) * resolution,
                    0.0,
                ),
                speed: Self::DEFAULT_SPEED,
                active: None,
            })),
        })
    }

    /// 设置移动速度
    pub fn with_speed(self, speed: f64) -> Self {
        self.world.lock().speed = speed;
        self
    }

    /// 与世界同尺寸的全未知地图
    pub fn blank_map(&self) -> GridMap {
        let world = self.world.lock();
        GridMap::new(
            world.width,
            world.height,
            world.resolution,
            Point::default(),
        )
    }

    /// 导航服务
    pub fn navigation(&self) -> SimNavigation {
        SimNavigation {
            world: self.world.clone(),
        }
    }

    /// 位姿来源
    pub fn pose_source(&self) -> SimPoseSource {
        SimPoseSource {
            world: self.world.clone(),
        }
    }

    /// 机器人真实位姿
    pub fn pose(&self) -> Pose {
        self.world.lock().pose
    }

    /// 是否有正在执行的目标
    pub fn has_active_goal(&self) -> bool {
        self.world.lock().active.is_some()
    }

    /// 推进 `dt`
    pub fn step(&self, dt: Duration) {
        let mut world = self.world.lock();
        let Some(goal) = world.active.as_ref().map(|active| active.goal) else {
            return;
        };

        if !world.is_free(&goal.position) {
            world.finish(TerminalState::Aborted);
            return;
        }

        let position = world.pose.position;
        let dx = goal.position.x - position.x;
        let dy = goal.position.y - position.y;
        let remaining = dx.hypot(dy);
        let travel = world.speed * dt.as_secs_f64();

        if remaining <= travel {
            world.pose = Pose::new(Point::new(goal.position.x, goal.position.y, 0.0), goal.orientation);
            world.finish(TerminalState::Succeeded);
            return;
        }

        let next = Point::new(
            position.x + dx / remaining * travel,
            position.y + dy / remaining * travel,
            0.0,
        );
        if !world.is_free(&next) {
            world.finish(TerminalState::Aborted);
            return;
        }
        world.pose = Pose::planar(next.x, next.y, dy.atan2(dx));
    }

    /// 揭示机器人周围 `radius` 米内的真实栅格
    pub fn sense(&self, map: &GridMap, radius: f64) {
        let world = self.world.lock();
        let position = world.pose.position;
        let reach = (radius / world.resolution).ceil() as i64;
        let cx = (position.x / world.resolution).floor() as i64;
        let cy = (position.y / world.resolution).floor() as i64;

        let mut updates = Vec::new();
        for y in (cy - reach)..=(cy + reach) {
            for x in (cx - reach)..=(cx + reach) {
                if x < 0 || y < 0 || x as usize >= world.width || y as usize >= world.height {
                    continue;
                }
                let center = Point::new(
                    (x as f64 + 0.5) * world.resolution,
                    (y as f64 + 0.5) * world.resolution,
                    0.0,
                );
                if center.planar_distance(&position) > radius {
                    continue;
                }
                let cell = y as usize * world.width + x as usize;
                let state = if world.occupied[cell] {
                    CellState::Occupied
                } else {
                    CellState::Free
                };
                updates.push((cell, state));
            }
        }
        drop(world);
        map.update(updates);
    }
}

/// 仿真导航服务
pub struct SimNavigation {
    world: Arc<Mutex<World>>,
}

impl NavigationActionClient for SimNavigation {
    fn wait_for_server(&self, _timeout: Duration) -> bool {
        true
    }

    fn send_goal(&self, goal: &Pose, events: GoalEventSender) -> Result<(), MotionError> {
        let mut world = self.world.lock();
        world.finish(TerminalState::Preempted);

        info!(
            "Simulated navigation accepted goal {} at ({:.2}, {:.2})",
            events.goal_id(),
            goal.position.x,
            goal.position.y
        );
        events.active();
        world.active = Some(ActiveGoal { goal: *goal, events });
        Ok(())
    }

    fn cancel_goal(&self, goal_id: GoalId) {
        let mut world = self.world.lock();
        if world
            .active
            .as_ref()
            .is_some_and(|active| active.events.goal_id() == goal_id)
        {
            world.finish(TerminalState::Preempted);
        }
    }
}

/// 仿真位姿来源
pub struct SimPoseSource {
    world: Arc<Mutex<World>>,
}

impl PoseSource for SimPoseSource {
    fn lookup(&self, _timeout: Duration) -> Result<Pose, MotionError> {
        Ok(self.world.lock().pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cam_motion::{MotionStatus, RobotMotionController};
    use cam_replan::MapQueryService;

    const CORRIDOR: &str = "
        #######
        #R....#
        #######
    ";

    fn controller(sim: &Simulation) -> RobotMotionController {
        let controller = RobotMotionController::new(
            Arc::new(sim.navigation()),
            Arc::new(sim.pose_source()),
        );
        controller.init().unwrap();
        controller
    }

    #[test]
    fn test_parse_world() {
        let sim = Simulation::from_ascii(CORRIDOR, 1.0).unwrap();
        let start = sim.pose().position;
        assert_eq!(start, Point::new(1.5, 1.5, 0.0));

        let map = sim.blank_map();
        assert_eq!((map.width(), map.height()), (7, 3));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Simulation::from_ascii("", 1.0).err(), Some(WorldError::Empty));
        assert_eq!(
            Simulation::from_ascii("R..\n..", 1.0).err(),
            Some(WorldError::Ragged { row: 1 })
        );
        assert_eq!(
            Simulation::from_ascii("R.x", 1.0).err(),
            Some(WorldError::BadCell {
                ch: 'x',
                row: 0,
                column: 2
            })
        );
        assert_eq!(Simulation::from_ascii("...", 1.0).err(), Some(WorldError::NoStart));
    }

    #[test]
    fn test_drives_to_goal() {
        let sim = Simulation::from_ascii(CORRIDOR, 1.0).unwrap().with_speed(1.0);
        let controller = controller(&sim);

        assert!(controller.go_to(Pose::planar(4.5, 1.5, 0.0)));
        for _ in 0..2 {
            sim.step(Duration::from_secs(1));
            assert!(controller.is_moving());
        }
        sim.step(Duration::from_secs(1));
        assert_eq!(controller.status(), MotionStatus::Succeeded);
        assert_eq!(sim.pose().position, Point::new(4.5, 1.5, 0.0));
        assert!(!sim.has_active_goal());
    }

    #[test]
    fn test_goal_in_wall_aborts() {
        let sim = Simulation::from_ascii(CORRIDOR, 1.0).unwrap();
        let controller = controller(&sim);

        assert!(controller.go_to(Pose::planar(3.5, 2.5, 0.0)));
        sim.step(Duration::from_millis(100));
        assert_eq!(controller.status(), MotionStatus::Error);
    }

    #[test]
    fn test_new_goal_preempts_old() {
        let sim = Simulation::from_ascii(CORRIDOR, 1.0).unwrap();
        let controller = controller(&sim);

        controller.go_to(Pose::planar(4.5, 1.5, 0.0));
        controller.go_to(Pose::planar(2.5, 1.5, 0.0));
        // 旧目标的 Preempted 回调被丢弃
        assert!(controller.is_moving());
    }

    #[test]
    fn test_cancel_preempts() {
        let sim = Simulation::from_ascii(CORRIDOR, 1.0).unwrap();
        let controller = controller(&sim);

        controller.go_to(Pose::planar(4.5, 1.5, 0.0));
        controller.cancel_goal();
        assert!(!sim.has_active_goal());
        assert_eq!(controller.status(), MotionStatus::Error);
    }

    #[test]
    fn test_sense_reveals_disk() {
        let sim = Simulation::from_ascii(CORRIDOR, 1.0).unwrap();
        let map = sim.blank_map();
        sim.sense(&map, 1.0);

        let robot_cell = map.cell_at(&sim.pose().position).unwrap();
        assert_eq!(map.state(robot_cell), Some(CellState::Free));
        // 左侧墙
        assert_eq!(map.state(robot_cell - 1), Some(CellState::Occupied));
        // 超出半径
        assert_eq!(map.state(robot_cell + 3), Some(CellState::Unknown));
        // 走廊右侧仍与未知相邻
        assert!(map.is_frontier_cell(robot_cell + 1));
    }
}
