//! simulate 命令
//!
//! 在仿真世界中运行探索循环，直到没有前沿、达到周期上限或收到 Ctrl-C。

use anyhow::{Context, Result, bail};
use cam_exploration::motion::{MotionConfig, RobotMotionController};
use cam_exploration::replan::CauseContext;
use cam_exploration::{CellState, Explorer, TickOutcome};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::world::{load_policy, load_world};

/// 仿真探索参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 策略文件（TOML），缺省使用内置策略
    #[arg(short, long)]
    pub policy: Option<PathBuf>,

    /// 世界地图（ASCII），缺省使用内置世界
    #[arg(short, long)]
    pub world: Option<PathBuf>,

    /// 最大周期数
    #[arg(short, long, default_value_t = 5000)]
    pub ticks: u64,

    /// 控制频率（Hz）
    #[arg(short, long, default_value_t = 20.0)]
    pub rate_hz: f64,

    /// 栅格边长（米）
    #[arg(long, default_value_t = 0.5)]
    pub resolution: f64,

    /// 移动速度（米/秒）
    #[arg(long, default_value_t = 0.5)]
    pub speed: f64,

    /// 传感器半径（米）
    #[arg(long, default_value_t = 1.5)]
    pub sensor_range: f64,

    /// 不按实时节奏休眠，尽快运行
    #[arg(long)]
    pub no_sleep: bool,
}

/// 运行统计
#[derive(Debug, Default)]
struct Summary {
    ticks: u64,
    goals_issued: u64,
    replans: u64,
    send_failures: u64,
    finished: bool,
}

impl SimulateCommand {
    pub fn execute(&self) -> Result<()> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            bail!("Invalid rate_hz: {} (must be > 0)", self.rate_hz);
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            bail!("Invalid resolution: {} (must be > 0)", self.resolution);
        }

        let sim = load_world(self.world.as_deref(), self.resolution)?.with_speed(self.speed);
        let policy_config = load_policy(self.policy.as_deref())?;
        if let Err(e) = policy_config.validate() {
            warn!("Policy check: {}", e);
        }

        let map = Arc::new(sim.blank_map());
        let motion = Arc::new(
            RobotMotionController::new(Arc::new(sim.navigation()), Arc::new(sim.pose_source()))
                .with_config(MotionConfig::default()),
        );
        motion.init().context("Failed to connect to the navigation service")?;

        let policy = policy_config.build_engine(CauseContext::new(motion.clone(), map.clone()));
        println!("🧭 Policy: {}", policy.cause_names().join(", "));
        let mut explorer = Explorer::new(motion.clone(), map.clone(), policy);

        let running = Arc::new(AtomicBool::new(true));
        let handler_flag = running.clone();
        ctrlc::set_handler(move || {
            eprintln!("\nReceived interrupt signal. Stopping exploration...");
            handler_flag.store(false, Ordering::Release);
        })
        .context("Failed to set signal handler")?;

        let period = Duration::from_secs_f64(1.0 / self.rate_hz);
        let started = Instant::now();
        let mut next_tick = Instant::now();
        let mut summary = Summary::default();

        while running.load(Ordering::Acquire) && summary.ticks < self.ticks {
            sim.sense(&map, self.sensor_range);
            summary.ticks += 1;

            match explorer.tick() {
                TickOutcome::Finished => {
                    summary.finished = true;
                    break;
                },
                TickOutcome::GoalIssued(_) => summary.goals_issued += 1,
                TickOutcome::Replanned(_) => {
                    summary.goals_issued += 1;
                    summary.replans += 1;
                },
                TickOutcome::SendFailed => summary.send_failures += 1,
                TickOutcome::Navigating | TickOutcome::PoseUnavailable => {},
            }

            sim.step(period);

            if !self.no_sleep {
                next_tick += period;
                let now = Instant::now();
                if next_tick > now {
                    spin_sleep::sleep(next_tick - now);
                } else {
                    next_tick = now;
                }
            }
        }

        if !running.load(Ordering::Acquire) {
            motion.cancel_goal();
        }

        let known = (0..map.width() * map.height())
            .filter(|&cell| map.state(cell) != Some(CellState::Unknown))
            .count();
        info!(
            "Exploration stopped after {} ticks ({:.2?} wall time)",
            summary.ticks,
            started.elapsed()
        );

        println!();
        println!("📊 Exploration summary:");
        println!("  Ticks: {}", summary.ticks);
        println!("  Finished: {}", summary.finished);
        println!("  Goals issued: {}", summary.goals_issued);
        println!("  Goals reached: {}", motion.goals_reached());
        println!("  Replans: {}", summary.replans);
        println!("  Send failures: {}", summary.send_failures);
        println!("  Abandoned frontiers: {}", explorer.abandoned());
        println!("  Known cells: {}/{}", known, map.width() * map.height());

        Ok(())
    }
}
