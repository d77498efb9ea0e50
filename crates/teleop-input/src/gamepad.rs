//! 手柄抽象
//!
//! HID 解析、设备枚举属于平台服务，本层只要求每个周期能轮询到一帧：
//! 若干模拟轴、若干数字按键以及连接状态。

use crate::InputError;

/// 模拟轴数量（编号 0..6）
pub const AXIS_COUNT: usize = 6;

/// 数字按键数量（编号 1..=12）
pub const BUTTON_COUNT: usize = 12;

/// 手柄连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

/// 手柄的一帧原始采样
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadFrame {
    /// 原始轴值，范围 `[-1.0, 1.0]`
    pub axes: [f32; AXIS_COUNT],
    /// 按键位图，第 `i - 1` 位对应按键 `i`
    pub buttons: u16,
    pub status: ConnectionStatus,
}

impl GamepadFrame {
    /// 已连接、全部归中的帧
    pub fn neutral() -> Self {
        Self {
            status: ConnectionStatus::Connected,
            ..Self::default()
        }
    }

    /// 设置轴值
    pub fn with_axis(mut self, index: usize, value: f32) -> Self {
        if let Some(axis) = self.axes.get_mut(index) {
            *axis = value;
        }
        self
    }

    /// 按下按键（从 1 开始编号，超出范围忽略）
    pub fn with_button(mut self, index: usize) -> Self {
        if (1..=BUTTON_COUNT).contains(&index) {
            self.buttons |= 1 << (index - 1);
        }
        self
    }

    /// 读取轴值
    pub fn axis(&self, index: usize) -> Result<f32, InputError> {
        self.axes.get(index).copied().ok_or(InputError::AxisOutOfRange {
            index,
            count: AXIS_COUNT,
        })
    }

    /// 读取按键状态（从 1 开始编号）
    pub fn button(&self, index: usize) -> Result<bool, InputError> {
        if !(1..=BUTTON_COUNT).contains(&index) {
            return Err(InputError::ButtonOutOfRange {
                index,
                count: BUTTON_COUNT,
            });
        }
        Ok(self.buttons & (1 << (index - 1)) != 0)
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }
}

/// 平台手柄服务
pub trait Gamepad {
    /// 轮询一帧
    fn poll(&mut self) -> Result<GamepadFrame, InputError>;
}

impl<G: Gamepad + ?Sized> Gamepad for Box<G> {
    fn poll(&mut self) -> Result<GamepadFrame, InputError> {
        (**self).poll()
    }
}
