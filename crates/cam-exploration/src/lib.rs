//! cam-exploration - 基于前沿的自主探索 SDK
//!
//! # 架构设计
//!
//! 分层结构，从底层到高层：
//!
//! - **运动层** (`motion`): 向导航动作服务下发目标，同步异步完成回调
//! - **策略层** (`replan`): 可配置的重规划原因及其逻辑或
//! - **探索层** (本 crate): 占据栅格地图、仿真导航、探索循环
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use cam_exploration::prelude::*;
//! use cam_exploration::sim::Simulation;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sim = Simulation::from_ascii("#####\n#R..#\n#####", 0.5)?;
//! let map = Arc::new(sim.blank_map());
//! let motion = Arc::new(RobotMotionController::new(
//!     Arc::new(sim.navigation()),
//!     Arc::new(sim.pose_source()),
//! ));
//! motion.init()?;
//!
//! let policy = ReplanConfig::from_toml_str("[[causes]]\nname = \"isolated_goal\"")?
//!     .build_engine(CauseContext::new(motion.clone(), map.clone()));
//! let mut explorer = Explorer::new(motion, map, policy);
//! let _ = explorer.tick();
//! # Ok(())
//! # }
//! ```

pub mod explorer;
pub mod grid;
pub mod logging;
pub mod prelude;
pub mod sim;

pub use cam_motion as motion;
pub use cam_replan as replan;

pub use explorer::{Explorer, TickOutcome};
pub use grid::{CellState, GridMap};
