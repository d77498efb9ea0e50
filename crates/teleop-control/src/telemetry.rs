//! 周期报告

use std::time::Duration;
use teleop_device::LeaderPositions;
use teleop_input::InputSample;
use teleop_protocol::{ControlMode, DriveOutputs};

/// 单个控制周期的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// 周期序号（从 0 开始）
    pub tick: u64,
    /// 周期开始时间（自时钟起点）
    pub timestamp: Duration,
    pub mode: ControlMode,
    /// 本周期是否切换了模式
    pub mode_changed: bool,
    pub sample: InputSample,
    pub outputs: DriveOutputs,
    /// 主电机编码器位置（仅直接输出模式且开启诊断时读取）
    pub positions: Option<LeaderPositions>,
    /// 本周期是否喂狗
    pub fed: bool,
    /// 喂狗后平台是否允许输出
    pub outputs_enabled: bool,
}

impl TickReport {
    /// 左侧命令数值
    pub fn left_value(&self) -> f32 {
        self.outputs.left.value().unwrap_or(0.0)
    }

    /// 右侧命令数值
    pub fn right_value(&self) -> f32 {
        self.outputs.right.value().unwrap_or(0.0)
    }

    /// 进料命令数值（本周期未下发时为 `None`）
    pub fn intake_value(&self) -> Option<f32> {
        self.outputs.intake.and_then(|c| c.value())
    }
}
