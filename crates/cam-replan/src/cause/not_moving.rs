//! 机器人没有前进
//!
//! 导航服务报告正在移动，但机器人在 `time_threshold` 内
//! 始终没有离开锚点 `distance_threshold` 范围。
//!
//! 锚点在以下情况重置：
//! - 机器人离开锚点范围
//! - 下发了新目标（即使位置与上一个目标相同）
//! - 状态不再是 `Moving`（同时返回 `false`）

use super::{CauseContext, CauseParams, ParamReader, ReplanCause};
use crate::clock::Clock;
use crate::motion_state::MotionState;
use cam_motion::{GoalId, MotionStatus, Point};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

const NAME: &str = "not_moving";

#[derive(Debug, Clone, Copy)]
struct Anchor {
    position: Point,
    goal_id: GoalId,
    since: Instant,
}

/// 机器人没有前进
pub struct NotMoving {
    motion: Arc<dyn MotionState>,
    clock: Arc<dyn Clock>,
    time_threshold: Duration,
    distance_threshold: f64,
    anchor: Option<Anchor>,
}

impl NotMoving {
    pub const DEFAULT_TIME_THRESHOLD: Duration = Duration::from_secs(5);
    pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.05;

    /// 参数：`time_threshold`（秒）、`distance_threshold`（米）
    pub fn new(params: &CauseParams, ctx: &CauseContext) -> Self {
        let reader = ParamReader::new(NAME, params, &["time_threshold", "distance_threshold"]);
        Self {
            motion: ctx.motion.clone(),
            clock: ctx.clock.clone(),
            time_threshold: reader.seconds_or("time_threshold", Self::DEFAULT_TIME_THRESHOLD),
            distance_threshold: reader
                .f64_or("distance_threshold", Self::DEFAULT_DISTANCE_THRESHOLD),
            anchor: None,
        }
    }

    pub fn time_threshold(&self) -> Duration {
        self.time_threshold
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }
}

impl ReplanCause for NotMoving {
    fn name(&self) -> &str {
        NAME
    }

    fn replan(&mut self) -> bool {
        if self.motion.status() != MotionStatus::Moving {
            self.anchor = None;
            return false;
        }

        let now = self.clock.now();
        let position = self.motion.pose().position;
        let goal_id = self.motion.current_goal_id();

        match self.anchor {
            Some(anchor)
                if anchor.goal_id == goal_id
                    && position.planar_distance(&anchor.position) <= self.distance_threshold =>
            {
                let stalled = now.duration_since(anchor.since);
                if stalled > self.time_threshold {
                    warn!(
                        "Robot has not moved more than {:.3}m in {:.1}s",
                        self.distance_threshold,
                        stalled.as_secs_f64()
                    );
                    true
                } else {
                    false
                }
            },
            _ => {
                self.anchor = Some(Anchor {
                    position,
                    goal_id,
                    since: now,
                });
                false
            },
        }
    }
}
