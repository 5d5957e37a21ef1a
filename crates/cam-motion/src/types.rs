//! 运动层基础类型
//!
//! 位姿、目标标识与运动状态。所有类型均为不可变值类型：
//! 位姿刷新时整体替换，而不是原地修改。

use nalgebra::{Quaternion as NaQuaternion, UnitQuaternion};
use std::fmt;

/// 三维坐标点（米）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// 创建新的坐标点
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 平面（XY）欧氏距离
    ///
    /// 地面机器人忽略高度分量。
    pub fn planar_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// 姿态四元数（x, y, z, w）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// 单位旋转
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// 绕 Z 轴旋转 `yaw` 弧度
    pub fn from_yaw(yaw: f64) -> Self {
        let half = yaw * 0.5;
        Self {
            x: 0.0,
            y: 0.0,
            z: half.sin(),
            w: half.cos(),
        }
    }

    /// 偏航角（弧度，范围 [-π, π]）
    pub fn yaw(&self) -> f64 {
        self.to_unit().euler_angles().2
    }

    /// 两个姿态之间的最短旋转角（弧度，范围 [0, π]）
    ///
    /// `q` 与 `-q` 表示同一旋转，结果为 0。
    pub fn angle_to(&self, other: &Quaternion) -> f64 {
        self.to_unit().angle_to(&other.to_unit())
    }

    fn to_unit(self) -> UnitQuaternion<f64> {
        // 全零四元数无法归一化，按单位旋转处理
        if self.x == 0.0 && self.y == 0.0 && self.z == 0.0 && self.w == 0.0 {
            return UnitQuaternion::identity();
        }
        UnitQuaternion::from_quaternion(NaQuaternion::new(self.w, self.x, self.y, self.z))
    }
}

/// 机器人位姿
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

impl Pose {
    pub const fn new(position: Point, orientation: Quaternion) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// 平面位姿（x, y, yaw）
    pub fn planar(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            position: Point::new(x, y, 0.0),
            orientation: Quaternion::from_yaw(yaw),
        }
    }
}

/// 目标序号
///
/// 每次下发目标递增。完成回调携带该序号，用于丢弃过期回调。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GoalId(pub u64);

impl GoalId {
    /// 下一个序号
    pub fn next(self) -> Self {
        GoalId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 运动状态
///
/// 只有导航服务显式报告成功时才为 `Succeeded`，其余终止结果均为 `Error`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    /// 正在前往当前目标
    Moving,
    /// 已到达当前目标
    Succeeded,
    /// 发送失败、被中止或其他终止结果
    Error,
}

impl fmt::Display for MotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MotionStatus::Moving => "MOVING",
            MotionStatus::Succeeded => "SUCCEEDED",
            MotionStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// 导航服务报告的目标终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Succeeded,
    Aborted,
    Preempted,
    Rejected,
    Recalled,
    Lost,
}

impl TerminalState {
    /// 折叠为运动状态
    pub fn to_status(self) -> MotionStatus {
        match self {
            TerminalState::Succeeded => MotionStatus::Succeeded,
            _ => MotionStatus::Error,
        }
    }
}
