//! 内置仿真世界与策略

use anyhow::{Context, Result};
use cam_exploration::replan::ReplanConfig;
use cam_exploration::sim::Simulation;
use std::fs;
use std::path::Path;

/// 内置世界：两个房间和一条走廊
pub const DEFAULT_WORLD: &str = "
####################
#R.......#.........#
#........#.........#
#........#....#....#
#..................#
#........#.........#
#####.####.........#
#........#.........#
#........#####.#####
#..................#
####################
";

/// 内置策略
pub const DEFAULT_POLICY: &str = r#"
verbosity = 1

[[causes]]
name = "not_moving"
params = { time_threshold = 5.0, distance_threshold = 0.05 }

[[causes]]
name = "too_much_time_near_goal"
params = { time_threshold = 5.0, distance_threshold = 0.5, orientation_threshold = 0.5 }

[[causes]]
name = "isolated_goal"
params = { depth = 3 }
"#;

/// 加载世界，未指定文件时使用内置世界
pub fn load_world(path: Option<&Path>, resolution: f64) -> Result<Simulation> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read world file {}", path.display()))?,
        None => DEFAULT_WORLD.to_string(),
    };
    Ok(Simulation::from_ascii(&text, resolution)?)
}

/// 加载策略，未指定文件时使用内置策略
pub fn load_policy(path: Option<&Path>) -> Result<ReplanConfig> {
    let config = match path {
        Some(path) => ReplanConfig::load(path)?,
        None => ReplanConfig::from_toml_str(DEFAULT_POLICY)?,
    };
    Ok(config)
}
