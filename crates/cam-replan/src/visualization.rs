//! 可视化输出
//!
//! 所有调用都是发出即忘：不等待结果，也从不出现在错误路径上。

use crate::map::CellId;

/// RGBA 颜色（0.0 - 1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 可视化输出端
pub trait VisualizationSink: Send + Sync {
    /// 注册一个图层
    fn register_layer(&self, key: &str, label: &str);

    /// 设置图层颜色
    fn set_color(&self, key: &str, color: Rgba);

    /// 发布图层内容
    fn publish(&self, key: &str, cells: &[CellId]);
}

/// 丢弃所有输出
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisualizationSink;

impl VisualizationSink for NullVisualizationSink {
    fn register_layer(&self, _key: &str, _label: &str) {}

    fn set_color(&self, _key: &str, _color: Rgba) {}

    fn publish(&self, _key: &str, _cells: &[CellId]) {}
}
