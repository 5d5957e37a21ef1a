//! 目标已与前沿隔离
//!
//! 以当前前沿目标点为中心，在 `depth` 跳范围内查找前沿栅格；
//! 一个都找不到说明目标附近已经探索完毕，应当换一个目标。

use super::{CauseContext, CauseParams, ParamReader, ReplanCause};
use crate::map::MapQueryService;
use crate::visualization::{Rgba, VisualizationSink};
use std::sync::Arc;
use tracing::debug;

const NAME: &str = "isolated_goal";

/// 目标邻域可视化图层
pub const GOAL_NEIGHBOUR_LAYER: &str = "goal_neighbour_cells";

const GOAL_NEIGHBOUR_COLOR: Rgba = Rgba::new(0.8, 0.2, 0.0, 1.0);

/// 目标已与前沿隔离
pub struct IsolatedGoal {
    map: Arc<dyn MapQueryService>,
    visualization: Arc<dyn VisualizationSink>,
    depth: u32,
}

impl IsolatedGoal {
    pub const DEFAULT_DEPTH: u32 = 5;

    /// 参数：`depth`（邻域跳数）
    pub fn new(params: &CauseParams, ctx: &CauseContext) -> Self {
        let reader = ParamReader::new(NAME, params, &["depth"]);
        let depth = reader.u32_or("depth", Self::DEFAULT_DEPTH);

        ctx.visualization
            .register_layer(GOAL_NEIGHBOUR_LAYER, GOAL_NEIGHBOUR_LAYER);
        ctx.visualization
            .set_color(GOAL_NEIGHBOUR_LAYER, GOAL_NEIGHBOUR_COLOR);

        Self {
            map: ctx.map.clone(),
            visualization: ctx.visualization.clone(),
            depth,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn is_near_frontier(&self) -> bool {
        let target = self.map.current_frontier_target_point();
        let neighbours = self.map.neighbours(&target, self.depth);
        self.visualization.publish(GOAL_NEIGHBOUR_LAYER, &neighbours);

        let near = neighbours.iter().any(|&cell| self.map.is_frontier_cell(cell));
        debug!(
            "Goal ({:.2}, {:.2}): {} neighbour cells, near frontier: {}",
            target.x,
            target.y,
            neighbours.len(),
            near
        );
        near
    }
}

impl ReplanCause for IsolatedGoal {
    fn name(&self) -> &str {
        NAME
    }

    fn replan(&mut self) -> bool {
        !self.is_near_frontier()
    }
}
