//! 重规划原因
//!
//! 每个原因判断一个触发条件，内部可以持有迟滞状态（如锁存时间戳），
//! 因此 `replan()` 不是纯函数：状态在多次调用之间保留，只在构造时重置。
//!
//! 原因集合是封闭的，通过 [`CauseKind`] 按名称构造：
//!
//! | 名称 | 类型 |
//! |------|------|
//! | `not_moving` | [`NotMoving`] |
//! | `too_much_time_near_goal` | [`TooMuchTimeNearGoal`] |
//! | `isolated_goal` | [`IsolatedGoal`] |

mod isolated_goal;
mod not_moving;
mod params;
mod too_much_time_near_goal;

pub use isolated_goal::{GOAL_NEIGHBOUR_LAYER, IsolatedGoal};
pub use not_moving::NotMoving;
pub use params::CauseParams;
pub(crate) use params::ParamReader;
pub use too_much_time_near_goal::TooMuchTimeNearGoal;

use crate::clock::{Clock, SystemClock};
use crate::error::ReplanError;
use crate::map::MapQueryService;
use crate::motion_state::MotionState;
use crate::visualization::{NullVisualizationSink, VisualizationSink};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 重规划原因
pub trait ReplanCause: Send {
    /// 诊断用名称
    fn name(&self) -> &str;

    /// 判断是否需要重规划（可能更新内部迟滞状态）
    fn replan(&mut self) -> bool;
}

/// 原因构造所需的协作者
#[derive(Clone)]
pub struct CauseContext {
    pub motion: Arc<dyn MotionState>,
    pub map: Arc<dyn MapQueryService>,
    pub visualization: Arc<dyn VisualizationSink>,
    pub clock: Arc<dyn Clock>,
}

impl CauseContext {
    /// 使用系统时钟，不输出可视化
    pub fn new(motion: Arc<dyn MotionState>, map: Arc<dyn MapQueryService>) -> Self {
        Self {
            motion,
            map,
            visualization: Arc::new(NullVisualizationSink),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_visualization(mut self, visualization: Arc<dyn VisualizationSink>) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// 原因类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseKind {
    NotMoving,
    TooMuchTimeNearGoal,
    IsolatedGoal,
}

impl CauseKind {
    /// 所有类型（按文档顺序）
    pub const ALL: [CauseKind; 3] = [
        CauseKind::NotMoving,
        CauseKind::TooMuchTimeNearGoal,
        CauseKind::IsolatedGoal,
    ];

    /// 配置中使用的名称
    pub fn as_str(self) -> &'static str {
        match self {
            CauseKind::NotMoving => "not_moving",
            CauseKind::TooMuchTimeNearGoal => "too_much_time_near_goal",
            CauseKind::IsolatedGoal => "isolated_goal",
        }
    }

    /// 构造对应的原因实例
    pub fn build(self, params: &CauseParams, ctx: &CauseContext) -> Box<dyn ReplanCause> {
        match self {
            CauseKind::NotMoving => Box::new(NotMoving::new(params, ctx)),
            CauseKind::TooMuchTimeNearGoal => Box::new(TooMuchTimeNearGoal::new(params, ctx)),
            CauseKind::IsolatedGoal => Box::new(IsolatedGoal::new(params, ctx)),
        }
    }
}

impl FromStr for CauseKind {
    type Err = ReplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CauseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ReplanError::UnknownCause(s.to_string()))
    }
}

impl fmt::Display for CauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_kind_from_str() {
        assert_eq!("not_moving".parse::<CauseKind>().unwrap(), CauseKind::NotMoving);
        assert_eq!(
            "too_much_time_near_goal".parse::<CauseKind>().unwrap(),
            CauseKind::TooMuchTimeNearGoal
        );
        assert_eq!(
            "isolated_goal".parse::<CauseKind>().unwrap(),
            CauseKind::IsolatedGoal
        );
        assert!(matches!(
            "NotMoving".parse::<CauseKind>(),
            Err(ReplanError::UnknownCause(name)) if name == "NotMoving"
        ));
    }

    #[test]
    fn test_cause_kind_roundtrip_names() {
        for kind in CauseKind::ALL {
            assert_eq!(kind.to_string().parse::<CauseKind>().unwrap(), kind);
        }
    }
}
