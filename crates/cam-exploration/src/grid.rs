//! 占据栅格地图
//!
//! 实现 [`MapQueryService`]，同时提供前沿检索供探索循环选择目标。
//!
//! - 栅格状态：未知 / 空闲 / 占据
//! - 前沿栅格：4 邻域中存在未知栅格的空闲栅格
//! - 邻域：8 连通意义下 `depth` 跳以内的栅格（含中心），按环由内向外排列

use cam_motion::Point;
use cam_replan::{CellId, MapQueryService};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;

/// 栅格状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Unknown,
    Free,
    Occupied,
}

#[derive(Debug)]
struct Cells {
    width: usize,
    height: usize,
    states: Vec<CellState>,
}

impl Cells {
    fn coords(&self, cell: CellId) -> Option<(i64, i64)> {
        (cell < self.states.len()).then(|| ((cell % self.width) as i64, (cell / self.width) as i64))
    }

    fn index(&self, cx: i64, cy: i64) -> Option<CellId> {
        if cx < 0 || cy < 0 || cx as usize >= self.width || cy as usize >= self.height {
            return None;
        }
        Some(cy as usize * self.width + cx as usize)
    }

    fn is_frontier(&self, cell: CellId) -> bool {
        let Some((cx, cy)) = self.coords(cell) else {
            return false;
        };
        if self.states[cell] != CellState::Free {
            return false;
        }
        [(1, 0), (-1, 0), (0, 1), (0, -1)].iter().any(|(dx, dy)| {
            self.index(cx + dx, cy + dy)
                .is_some_and(|n| self.states[n] == CellState::Unknown)
        })
    }
}

/// 占据栅格地图
///
/// 内部使用读写锁，可以通过 `Arc` 在探索循环和重规划原因之间共享。
#[derive(Debug)]
pub struct GridMap {
    resolution: f64,
    origin: Point,
    cells: RwLock<Cells>,
    frontier_target: Mutex<Point>,
}

impl GridMap {
    /// 创建全未知地图
    ///
    /// `origin` 为 (0, 0) 号栅格左下角的世界坐标，`resolution` 为栅格边长（米）。
    pub fn new(width: usize, height: usize, resolution: f64, origin: Point) -> Self {
        Self {
            resolution,
            origin,
            cells: RwLock::new(Cells {
                width,
                height,
                states: vec![CellState::Unknown; width * height],
            }),
            frontier_target: Mutex::new(origin),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.read().width
    }

    pub fn height(&self) -> usize {
        self.cells.read().height
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// 世界坐标所在的栅格
    pub fn cell_at(&self, point: &Point) -> Option<CellId> {
        let (cx, cy) = self.grid_coords(point);
        self.cells.read().index(cx, cy)
    }

    /// 栅格中心的世界坐标
    pub fn cell_center(&self, cell: CellId) -> Option<Point> {
        let (cx, cy) = self.cells.read().coords(cell)?;
        Some(Point::new(
            self.origin.x + (cx as f64 + 0.5) * self.resolution,
            self.origin.y + (cy as f64 + 0.5) * self.resolution,
            0.0,
        ))
    }

    pub fn state(&self, cell: CellId) -> Option<CellState> {
        self.cells.read().states.get(cell).copied()
    }

    /// 更新单个栅格
    pub fn set_state(&self, cell: CellId, state: CellState) {
        if let Some(slot) = self.cells.write().states.get_mut(cell) {
            *slot = state;
        }
    }

    /// 批量更新
    pub fn update<I>(&self, updates: I)
    where
        I: IntoIterator<Item = (CellId, CellState)>,
    {
        let mut cells = self.cells.write();
        for (cell, state) in updates {
            if let Some(slot) = cells.states.get_mut(cell) {
                *slot = state;
            }
        }
    }

    /// 所有前沿栅格
    pub fn frontier_cells(&self) -> Vec<CellId> {
        let cells = self.cells.read();
        (0..cells.states.len())
            .filter(|&cell| cells.is_frontier(cell))
            .collect()
    }

    /// 距 `from` 最近的前沿栅格（跳过 `excluded`）
    pub fn nearest_frontier(&self, from: &Point, excluded: &HashSet<CellId>) -> Option<CellId> {
        self.frontier_cells()
            .into_iter()
            .filter(|cell| !excluded.contains(cell))
            .filter_map(|cell| Some((cell, self.cell_center(cell)?.planar_distance(from))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(cell, _)| cell)
    }

    /// 设置当前前沿目标点
    pub fn set_frontier_target(&self, point: Point) {
        *self.frontier_target.lock() = point;
    }

    fn grid_coords(&self, point: &Point) -> (i64, i64) {
        (
            ((point.x - self.origin.x) / self.resolution).floor() as i64,
            ((point.y - self.origin.y) / self.resolution).floor() as i64,
        )
    }
}

impl MapQueryService for GridMap {
    fn neighbours(&self, point: &Point, depth: u32) -> Vec<CellId> {
        let (cx, cy) = self.grid_coords(point);
        let cells = self.cells.read();
        if cells.index(cx, cy).is_none() {
            return Vec::new();
        }

        let depth = i64::from(depth);
        let mut result = Vec::new();
        for ring in 0..=depth {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    // 只取当前环上的栅格
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    if let Some(cell) = cells.index(cx + dx, cy + dy) {
                        result.push(cell);
                    }
                }
            }
        }
        result
    }

    fn is_frontier_cell(&self, cell: CellId) -> bool {
        self.cells.read().is_frontier(cell)
    }

    fn current_frontier_target_point(&self) -> Point {
        *self.frontier_target.lock()
    }
}
