//! Prelude 模块
//!
//! ```rust
//! use cam_exploration::prelude::*;
//! ```

pub use cam_motion::{
    GoalId, MotionConfig, MotionError, MotionStatus, NavigationActionClient, Point, Pose,
    PoseSource, Quaternion, RobotMotionController, TerminalState,
};
pub use cam_replan::{
    CauseContext, CauseKind, CauseParams, Clock, MapQueryService, ReplanCause, ReplanConfig,
    ReplanError, ReplanPolicyEngine, VisualizationSink,
};

pub use crate::explorer::{Explorer, TickOutcome};
pub use crate::grid::{CellState, GridMap};
