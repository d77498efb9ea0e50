//! 模式选择
//!
//! 两个按键对应两种互斥的控制模式。按住的按键每个周期都会重新设置同一模式
//! （幂等）。两个按键同时按下时，伺服模式的检查在后，伺服模式生效。

use teleop_input::ButtonSample;
use teleop_protocol::ControlMode;

/// 根据按键选择控制模式
///
/// 没有按键按下时保持当前模式。
pub fn select_mode(current: ControlMode, buttons: &ButtonSample) -> ControlMode {
    let mut mode = current;
    if buttons.direct_mode {
        mode = ControlMode::DirectOutput;
    }
    if buttons.servo_mode {
        mode = ControlMode::PositionalServo;
    }
    mode
}
