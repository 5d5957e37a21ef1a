//! check-policy 命令
//!
//! 加载策略文件，校验后列出引擎实际构造出的原因。

use anyhow::Result;
use cam_exploration::motion::RobotMotionController;
use cam_exploration::replan::CauseContext;
use cam_exploration::sim::Simulation;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::world::{DEFAULT_WORLD, load_policy};

/// 策略检查参数
#[derive(Args, Debug)]
pub struct CheckPolicyCommand {
    /// 策略文件（TOML）
    pub path: PathBuf,
}

impl CheckPolicyCommand {
    pub fn execute(&self) -> Result<()> {
        println!("📜 Loading policy: {}", self.path.display());
        let config = load_policy(Some(&self.path))?;

        println!("    verbosity = {}", config.verbosity);
        for cause in &config.causes {
            let params: Vec<String> = cause
                .params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            println!("    - {} {{{}}}", cause.name, params.join(", "));
        }

        // 在内置世界上构造一次，触发与运行时相同的参数诊断
        let sim = Simulation::from_ascii(DEFAULT_WORLD, 1.0)?;
        let motion = Arc::new(RobotMotionController::new(
            Arc::new(sim.navigation()),
            Arc::new(sim.pose_source()),
        ));
        let engine = config.build_engine(CauseContext::new(motion, Arc::new(sim.blank_map())));
        println!(
            "✅ Built {} of {} causes: {}",
            engine.len(),
            config.causes.len(),
            engine.cause_names().join(", ")
        );

        config.validate()?;
        Ok(())
    }
}
