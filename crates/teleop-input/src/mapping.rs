//! 手柄映射
//!
//! 默认值对应 Logitech F710（D 模式）：
//!
//! | 功能 | 编号 |
//! |------|------|
//! | 左摇杆 Y（前后） | 轴 1 |
//! | 右摇杆 X（转向） | 轴 2 |
//! | 右摇杆 Y（辅助转向） | 轴 5 |
//! | 左上肩键：直接输出模式 | 按键 5 |
//! | 左下肩键：位置伺服模式 | 按键 7 |
//! | 右上肩键：进料正转 | 按键 6 |
//! | 右下肩键：进料反转 | 按键 8 |
//!
//! 手柄的原始轴值向前推为负，因此默认对所有轴取反。

use crate::{AXIS_COUNT, BUTTON_COUNT, InputError};
use teleop_protocol::DEFAULT_DEADBAND;

/// 手柄轴与按键映射
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GamepadMapping {
    pub left_y_axis: usize,
    pub right_x_axis: usize,
    pub right_y_axis: usize,
    /// 读取后对所有轴取反
    pub invert_axes: bool,
    pub direct_mode_button: usize,
    pub servo_mode_button: usize,
    /// "上"按键：进料正转
    pub intake_forward_button: usize,
    /// "下"按键：进料反转
    pub intake_reverse_button: usize,
    /// 驱动轴死区阈值
    pub deadband: f32,
}

impl Default for GamepadMapping {
    fn default() -> Self {
        Self {
            left_y_axis: 1,
            right_x_axis: 2,
            right_y_axis: 5,
            invert_axes: true,
            direct_mode_button: 5,
            servo_mode_button: 7,
            intake_forward_button: 6,
            intake_reverse_button: 8,
            deadband: DEFAULT_DEADBAND,
        }
    }
}

impl GamepadMapping {
    /// 检查映射是否在手柄范围内
    pub fn validate(&self) -> Result<(), InputError> {
        for index in [self.left_y_axis, self.right_x_axis, self.right_y_axis] {
            if index >= AXIS_COUNT {
                return Err(InputError::AxisOutOfRange {
                    index,
                    count: AXIS_COUNT,
                });
            }
        }
        for index in [
            self.direct_mode_button,
            self.servo_mode_button,
            self.intake_forward_button,
            self.intake_reverse_button,
        ] {
            if !(1..=BUTTON_COUNT).contains(&index) {
                return Err(InputError::ButtonOutOfRange {
                    index,
                    count: BUTTON_COUNT,
                });
            }
        }
        if !(0.0..1.0).contains(&self.deadband) {
            return Err(InputError::InvalidDeadband(self.deadband));
        }
        Ok(())
    }

    /// 轴方向系数
    pub fn axis_sign(&self) -> f32 {
        if self.invert_axes { -1.0 } else { 1.0 }
    }
}
