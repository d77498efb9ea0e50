//! 输出混合器
//!
//! 把过滤后的轴值和当前模式换算为左右驱动命令和进料命令。
//! 纯函数：相同输入和模式总是得到相同输出，没有内部状态。
//!
//! # 直接输出模式
//!
//! 三次方整形保留符号和满量程，同时压平小幅摇杆响应：
//!
//! ```text
//! left  =  ly³ - rx³
//! right = -ly³ - rx³
//! ```
//!
//! 右侧电机与左侧镜像安装，前进时输出反号。
//!
//! # 位置伺服模式
//!
//! 每个轴乘以固定比例（默认 40960，即满杆 ±10 圈），按同样的符号组合为
//! 相对启动零点的绝对目标位置。

use teleop_input::{AxisSample, ButtonSample};
use teleop_protocol::{
    ControlMode, DriveOutputs, MotorCommand, ProtocolError, SERVO_UNITS_PER_FULL_STICK,
};

/// 混合器配置
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MixerConfig {
    /// 位置伺服模式下满杆对应的原生单位
    pub servo_scale: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            servo_scale: SERVO_UNITS_PER_FULL_STICK,
        }
    }
}

impl MixerConfig {
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !self.servo_scale.is_finite() || self.servo_scale <= 0.0 {
            return Err(ProtocolError::out_of_range(
                "servo_scale",
                f64::from(self.servo_scale),
                "> 0",
            ));
        }
        Ok(())
    }
}

/// 三次方整形
#[inline]
pub fn cubic(value: f32) -> f32 {
    value * value * value
}

/// 进料输出：上键 +1.0，下键 -1.0，都没按 0.0（同时按下时上键优先）
pub fn intake_output(buttons: &ButtonSample) -> f32 {
    if buttons.intake_forward {
        1.0
    } else if buttons.intake_reverse {
        -1.0
    } else {
        0.0
    }
}

/// 输出混合器
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMixer {
    config: MixerConfig,
}

impl OutputMixer {
    pub fn new(config: MixerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// 计算一个周期的驱动输出
    pub fn mix(
        &self,
        axes: &AxisSample,
        buttons: &ButtonSample,
        mode: ControlMode,
    ) -> DriveOutputs {
        match mode {
            ControlMode::DirectOutput => {
                let ly = cubic(axes.left_y);
                let rx = cubic(axes.right_x);
                DriveOutputs {
                    left: MotorCommand::PercentOutput(ly - rx),
                    right: MotorCommand::PercentOutput(-ly - rx),
                    intake: Some(MotorCommand::PercentOutput(intake_output(buttons))),
                    secondary_target: None,
                }
            },
            ControlMode::PositionalServo => {
                let scale = self.config.servo_scale;
                let ly = axes.left_y * scale;
                let rx = axes.right_x * scale;
                DriveOutputs {
                    left: MotorCommand::MotionMagic(ly - rx),
                    right: MotorCommand::MotionMagic(-ly - rx),
                    intake: None,
                    secondary_target: Some(axes.right_y * scale),
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes(left_y: f32, right_x: f32, right_y: f32) -> AxisSample {
        AxisSample {
            left_y,
            right_x,
            right_y,
        }
    }

    #[test]
    fn test_direct_forward_half_stick() {
        let out = OutputMixer::default().mix(
            &axes(0.5, 0.0, 0.0),
            &ButtonSample::default(),
            ControlMode::DirectOutput,
        );
        assert_eq!(out.left, MotorCommand::PercentOutput(0.125));
        assert_eq!(out.right, MotorCommand::PercentOutput(-0.125));
        assert_eq!(out.intake, Some(MotorCommand::PercentOutput(0.0)));
        assert_eq!(out.secondary_target, None);
    }

    #[test]
    fn test_direct_rotate() {
        let out = OutputMixer::default().mix(
            &axes(0.0, 1.0, 0.0),
            &ButtonSample::default(),
            ControlMode::DirectOutput,
        );
        // 原地旋转：两侧同号
        assert_eq!(out.left, MotorCommand::PercentOutput(-1.0));
        assert_eq!(out.right, MotorCommand::PercentOutput(-1.0));
    }

    #[test]
    fn test_direct_zero_axes() {
        let out = OutputMixer::default().mix(
            &AxisSample::default(),
            &ButtonSample::default(),
            ControlMode::DirectOutput,
        );
        assert_eq!(out.left.value(), Some(0.0));
        assert_eq!(out.right.value().map(f32::abs), Some(0.0));
    }

    #[test]
    fn test_servo_full_forward() {
        let out = OutputMixer::default().mix(
            &axes(1.0, 0.0, 0.0),
            &ButtonSample::default(),
            ControlMode::PositionalServo,
        );
        assert_eq!(out.left, MotorCommand::MotionMagic(40960.0));
        assert_eq!(out.right, MotorCommand::MotionMagic(-40960.0));
        assert_eq!(out.intake, None);
        assert_eq!(out.mode(), Some(ControlMode::PositionalServo));
    }

    #[test]
    fn test_servo_is_linear_and_scales_secondary() {
        let mixer = OutputMixer::new(MixerConfig { servo_scale: 1000.0 });
        let out = mixer.mix(
            &axes(0.5, 0.25, -0.5),
            &ButtonSample::default(),
            ControlMode::PositionalServo,
        );
        assert_eq!(out.left, MotorCommand::MotionMagic(250.0));
        assert_eq!(out.right, MotorCommand::MotionMagic(-750.0));
        assert_eq!(out.secondary_target, Some(-500.0));
    }

    #[test]
    fn test_intake_selector() {
        let b = |intake_forward, intake_reverse| ButtonSample {
            intake_forward,
            intake_reverse,
            ..ButtonSample::default()
        };
        assert_eq!(intake_output(&b(false, false)), 0.0);
        assert_eq!(intake_output(&b(true, false)), 1.0);
        assert_eq!(intake_output(&b(false, true)), -1.0);
        assert_eq!(intake_output(&b(true, true)), 1.0);
    }

    #[test]
    fn test_servo_ignores_intake_buttons() {
        let buttons = ButtonSample {
            intake_forward: true,
            ..ButtonSample::default()
        };
        let out = OutputMixer::default().mix(
            &AxisSample::default(),
            &buttons,
            ControlMode::PositionalServo,
        );
        assert_eq!(out.intake, None);
    }

    #[test]
    fn test_mixer_config_validate() {
        assert!(MixerConfig::default().validate().is_ok());
        for servo_scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(MixerConfig { servo_scale }.validate().is_err());
        }
    }

    #[test]
    fn test_cubic_preserves_sign() {
        assert_eq!(cubic(-0.5), -0.125);
        assert_eq!(cubic(1.0), 1.0);
        assert_eq!(cubic(-1.0), -1.0);
    }
}
