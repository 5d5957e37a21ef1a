//! 地图查询接口
//!
//! 前沿检测和栅格维护由外部地图服务负责，这里只消费查询结果。

use cam_motion::Point;

/// 栅格索引
pub type CellId = usize;

/// 地图查询服务
pub trait MapQueryService: Send + Sync {
    /// `point` 所在栅格 `depth` 跳以内的邻居栅格
    fn neighbours(&self, point: &Point, depth: u32) -> Vec<CellId>;

    /// 栅格是否为前沿栅格（与未探索区域相邻）
    fn is_frontier_cell(&self, cell: CellId) -> bool;

    /// 当前前沿目标点
    fn current_frontier_target_point(&self) -> Point;
}
