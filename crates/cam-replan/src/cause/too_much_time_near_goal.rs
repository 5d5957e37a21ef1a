//! 在目标附近停留过久
//!
//! 机器人进入目标 `distance_threshold` 范围后开始计时，
//! 连续停留超过 `time_threshold` 且姿态检查通过时触发。
//! 离开后再次进入会重新计时。触发后只要条件仍成立，每次调用都返回 `true`。

use super::{CauseContext, CauseParams, ParamReader, ReplanCause};
use crate::clock::Clock;
use crate::motion_state::MotionState;
use cam_motion::Pose;
use std::f64::consts::PI;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

const NAME: &str = "too_much_time_near_goal";

/// 在目标附近停留过久
pub struct TooMuchTimeNearGoal {
    motion: Arc<dyn MotionState>,
    clock: Arc<dyn Clock>,
    time_threshold: Duration,
    distance_threshold: f64,
    orientation_threshold: f64,
    /// 上一次调用时是否在目标附近
    near_goal: bool,
    /// 最近一次进入目标附近的时刻
    prev: Instant,
}

impl TooMuchTimeNearGoal {
    pub const DEFAULT_TIME_THRESHOLD: Duration = Duration::from_secs(5);
    pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_ORIENTATION_THRESHOLD: f64 = 0.5;

    /// 参数：`time_threshold`（秒）、`distance_threshold`（米）、`orientation_threshold`（弧度）
    pub fn new(params: &CauseParams, ctx: &CauseContext) -> Self {
        let reader = ParamReader::new(
            NAME,
            params,
            &["time_threshold", "distance_threshold", "orientation_threshold"],
        );
        let mut cause = Self {
            motion: ctx.motion.clone(),
            clock: ctx.clock.clone(),
            time_threshold: reader.seconds_or("time_threshold", Self::DEFAULT_TIME_THRESHOLD),
            distance_threshold: reader
                .f64_or("distance_threshold", Self::DEFAULT_DISTANCE_THRESHOLD),
            orientation_threshold: reader
                .f64_or("orientation_threshold", Self::DEFAULT_ORIENTATION_THRESHOLD),
            near_goal: false,
            prev: ctx.clock.now(),
        };
        let robot = cause.motion.pose();
        let goal = cause.motion.current_goal();
        cause.near_goal = cause.is_near_goal(&robot, &goal);
        cause
    }

    pub fn time_threshold(&self) -> Duration {
        self.time_threshold
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    pub fn orientation_threshold(&self) -> f64 {
        self.orientation_threshold
    }

    fn is_near_goal(&self, robot: &Pose, goal: &Pose) -> bool {
        robot.position.planar_distance(&goal.position) < self.distance_threshold
    }

    /// 注意：比较的是与“完全相反朝向”的差距，而不是与目标朝向的差距
    fn is_oriented(&self, robot: &Pose, goal: &Pose) -> bool {
        let diff = PI - robot.orientation.angle_to(&goal.orientation);
        trace!(
            "Orientation diff {:.3}, threshold {:.3}",
            diff, self.orientation_threshold
        );
        diff < self.orientation_threshold
    }
}

impl ReplanCause for TooMuchTimeNearGoal {
    fn name(&self) -> &str {
        NAME
    }

    fn replan(&mut self) -> bool {
        let now = self.clock.now();
        // 同一次判断只读一次位姿和目标
        let robot = self.motion.pose();
        let goal = self.motion.current_goal();

        let near_goal_now = self.is_near_goal(&robot, &goal);
        if !self.near_goal && near_goal_now {
            self.prev = now;
        }
        self.near_goal = near_goal_now;

        near_goal_now && now.duration_since(self.prev) > self.time_threshold
            && self.is_oriented(&robot, &goal)
    }
}
