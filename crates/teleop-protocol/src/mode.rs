//! 控制模式定义
//!
//! 定义遥操作循环的两种互斥控制模式。

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// 控制模式
///
/// # 模式说明
///
/// - **DirectOutput**: 直接输出模式，命令值为 `[-1.0, 1.0]` 的百分比输出
/// - **PositionalServo**: 位置伺服模式（Motion Magic），命令值为原生单位的目标位置，
///   由设备内部的轨迹规划和 PID 驱动到目标
///
/// 启动时为 `DirectOutput`，只有模式按键被按下时才会改变。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ControlMode {
    /// 直接输出模式（默认）
    #[default]
    DirectOutput = 0,

    /// 位置伺服模式
    PositionalServo = 1,
}

impl ControlMode {
    /// 是否为直接输出模式
    pub fn is_direct(self) -> bool {
        self == Self::DirectOutput
    }

    /// 是否为位置伺服模式
    pub fn is_servo(self) -> bool {
        self == Self::PositionalServo
    }

    /// 模式名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectOutput => "direct-output",
            Self::PositionalServo => "positional-servo",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
