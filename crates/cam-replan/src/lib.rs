//! 重规划策略层
//!
//! 在每个控制周期判断是否放弃当前目标、换一个新目标。
//!
//! # 架构
//!
//! ```text
//! ┌──────────────────────┐
//! │  ReplanPolicyEngine  │  结果 = 所有原因的逻辑或
//! ├──────────────────────┤
//! │ NotMoving            │ ─┐
//! │ TooMuchTimeNearGoal  │ ─┼─▶ MotionState（位姿 / 目标 / 状态）
//! │ IsolatedGoal         │ ─┴─▶ MapQueryService / VisualizationSink
//! └──────────────────────┘
//! ```
//!
//! 原因由名称和字符串参数表构造（见 [`CauseKind`]），
//! 通常来自 TOML 策略文件（见 [`ReplanConfig`]）。

pub mod cause;
pub mod clock;
pub mod config;
mod engine;
mod error;
pub mod map;
pub mod motion_state;
pub mod visualization;

#[cfg(test)]
mod test_support;

pub use cause::{
    CauseContext, CauseKind, CauseParams, IsolatedGoal, NotMoving, ReplanCause,
    TooMuchTimeNearGoal,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CauseConfig, ParamValue, ReplanConfig};
pub use engine::ReplanPolicyEngine;
pub use error::ReplanError;
pub use map::{CellId, MapQueryService};
pub use motion_state::MotionState;
pub use visualization::{NullVisualizationSink, Rgba, VisualizationSink};
