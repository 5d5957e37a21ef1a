//! # cam-cli
//!
//! 仿真前沿探索的命令行工具。
//!
//! ```bash
//! # 使用内置世界和策略运行探索
//! cam-cli simulate --ticks 2000 --rate-hz 20
//!
//! # 指定策略文件和世界地图，不按实时节奏运行
//! cam-cli simulate --policy policy.toml --world room.txt --no-sleep
//!
//! # 检查策略文件
//! cam-cli check-policy policy.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod world;

use commands::{CheckPolicyCommand, SimulateCommand};

/// cam-cli - 前沿探索仿真工具
#[derive(Parser, Debug)]
#[command(name = "cam-cli")]
#[command(about = "Simulated frontier exploration with a configurable replanning policy", long_about = None)]
#[command(version)]
struct Cli {
    /// 未设置 RUST_LOG 时的日志过滤指令
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 在仿真世界中运行探索
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },

    /// 加载策略文件并列出构造出的原因
    CheckPolicy {
        #[command(flatten)]
        args: CheckPolicyCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cam_exploration::logging::init_with_default(&cli.log);

    match cli.command {
        Commands::Simulate { args } => args.execute(),
        Commands::CheckPolicy { args } => args.execute(),
    }
}
