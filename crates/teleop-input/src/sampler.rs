//! 输入采样器
//!
//! 每个周期：读取三个模拟轴和四个按键，对两个驱动轴做死区过滤。
//! 辅助旋转轴（右摇杆 Y）不过滤。除读取外没有副作用。

use crate::{Gamepad, GamepadFrame, GamepadMapping, InputError, deadband};
use tracing::trace;

/// 轴采样（已取向、已过滤）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSample {
    /// 前后
    pub left_y: f32,
    /// 转向
    pub right_x: f32,
    /// 辅助转向
    pub right_y: f32,
}

/// 按键采样
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonSample {
    pub direct_mode: bool,
    pub servo_mode: bool,
    pub intake_forward: bool,
    pub intake_reverse: bool,
}

/// 单个周期的输入采样
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSample {
    pub axes: AxisSample,
    pub buttons: ButtonSample,
    pub connected: bool,
}

/// 输入采样器
#[derive(Debug, Clone)]
pub struct InputSampler {
    mapping: GamepadMapping,
}

impl InputSampler {
    /// 创建采样器（映射非法时返回错误）
    pub fn new(mapping: GamepadMapping) -> Result<Self, InputError> {
        mapping.validate()?;
        Ok(Self { mapping })
    }

    pub fn mapping(&self) -> &GamepadMapping {
        &self.mapping
    }

    /// 轮询手柄并采样
    pub fn sample<G: Gamepad + ?Sized>(&self, gamepad: &mut G) -> Result<InputSample, InputError> {
        let frame = gamepad.poll()?;
        self.sample_frame(&frame)
    }

    /// 把一帧原始数据转换为采样
    pub fn sample_frame(&self, frame: &GamepadFrame) -> Result<InputSample, InputError> {
        let m = &self.mapping;
        let sign = m.axis_sign();

        let left_y = sign * frame.axis(m.left_y_axis)?;
        let right_x = sign * frame.axis(m.right_x_axis)?;
        let right_y = sign * frame.axis(m.right_y_axis)?;

        let sample = InputSample {
            axes: AxisSample {
                left_y: deadband(left_y, m.deadband),
                right_x: deadband(right_x, m.deadband),
                right_y,
            },
            buttons: ButtonSample {
                direct_mode: frame.button(m.direct_mode_button)?,
                servo_mode: frame.button(m.servo_mode_button)?,
                intake_forward: frame.button(m.intake_forward_button)?,
                intake_reverse: frame.button(m.intake_reverse_button)?,
            },
            connected: frame.is_connected(),
        };
        trace!("Input sample: {:?}", sample);
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> InputSampler {
        InputSampler::new(GamepadMapping::default()).unwrap()
    }

    #[test]
    fn test_axes_inverted_and_filtered() {
        // 原始值向前推为负
        let frame = GamepadFrame::neutral()
            .with_axis(1, -0.5)
            .with_axis(2, 0.05)
            .with_axis(5, -0.05);
        let sample = sampler().sample_frame(&frame).unwrap();

        assert_eq!(sample.axes.left_y, 0.5);
        assert_eq!(sample.axes.right_x, 0.0);
        // 辅助轴不做死区
        assert_eq!(sample.axes.right_y, 0.05);
        assert!(sample.connected);
    }

    #[test]
    fn test_buttons_mapped() {
        let frame = GamepadFrame::neutral().with_button(7).with_button(6);
        let sample = sampler().sample_frame(&frame).unwrap();
        assert_eq!(
            sample.buttons,
            ButtonSample {
                direct_mode: false,
                servo_mode: true,
                intake_forward: true,
                intake_reverse: false,
            }
        );
    }

    #[test]
    fn test_non_inverted_mapping() {
        let mapping = GamepadMapping {
            invert_axes: false,
            ..GamepadMapping::default()
        };
        let sampler = InputSampler::new(mapping).unwrap();
        let frame = GamepadFrame::neutral().with_axis(1, -0.5);
        assert_eq!(sampler.sample_frame(&frame).unwrap().axes.left_y, -0.5);
    }

    #[test]
    fn test_disconnected_frame() {
        let sample = sampler().sample_frame(&GamepadFrame::default()).unwrap();
        assert!(!sample.connected);
        assert_eq!(sample.axes, AxisSample::default());
    }

    #[test]
    fn test_invalid_mapping_rejected() {
        let mapping = GamepadMapping {
            left_y_axis: 42,
            ..GamepadMapping::default()
        };
        assert!(InputSampler::new(mapping).is_err());
    }

    #[test]
    fn test_poll_error_propagates() {
        struct Broken;
        impl Gamepad for Broken {
            fn poll(&mut self) -> Result<GamepadFrame, InputError> {
                Err(InputError::Device("unplugged".to_string()))
            }
        }
        let err = sampler().sample(&mut Broken).unwrap_err();
        assert!(matches!(err, InputError::Device(_)));
    }
}
