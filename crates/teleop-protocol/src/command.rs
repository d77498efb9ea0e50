//! 电机命令定义
//!
//! 命令值的单位取决于控制模式，因此使用带标签的变体表达，
//! 而不是单个按模式解释的数值字段。

use crate::{ControlMode, DeviceId};

/// 电机命令
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorCommand {
    /// 百分比输出，范围 `[-1.0, 1.0]`
    PercentOutput(f32),

    /// Motion Magic 目标位置（原生单位，相对启动时的零点）
    MotionMagic(f32),

    /// 跟随指定主电机的输出
    ///
    /// 只在启动配置阶段发送一次。
    Follow(DeviceId),

    /// 空档（按设备的 neutral mode 刹车或滑行）
    Neutral,
}

impl MotorCommand {
    /// 命令对应的控制模式
    ///
    /// `Follow` 和 `Neutral` 不属于遥操作的两种模式，返回 `None`。
    pub fn control_mode(&self) -> Option<ControlMode> {
        match self {
            Self::PercentOutput(_) => Some(ControlMode::DirectOutput),
            Self::MotionMagic(_) => Some(ControlMode::PositionalServo),
            Self::Follow(_) | Self::Neutral => None,
        }
    }

    /// 按控制模式构造命令
    pub fn for_mode(mode: ControlMode, value: f32) -> Self {
        match mode {
            ControlMode::DirectOutput => Self::PercentOutput(value),
            ControlMode::PositionalServo => Self::MotionMagic(value),
        }
    }

    /// 数值部分（`Follow` / `Neutral` 返回 `None`）
    pub fn value(&self) -> Option<f32> {
        match self {
            Self::PercentOutput(v) | Self::MotionMagic(v) => Some(*v),
            Self::Follow(_) | Self::Neutral => None,
        }
    }

    /// 是否为跟随命令
    pub fn is_follow(&self) -> bool {
        matches!(self, Self::Follow(_))
    }
}

/// 单个控制周期的驱动输出
///
/// 由输出混合器每周期重新计算，立即交给执行层，不做保存。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveOutputs {
    /// 左侧主电机命令
    pub left: MotorCommand,

    /// 右侧主电机命令
    pub right: MotorCommand,

    /// 进料电机命令
    ///
    /// 位置伺服模式下为 `None`，进料电机保持上一次的命令。
    pub intake: Option<MotorCommand>,

    /// 辅助旋转轴换算出的目标（原生单位）
    ///
    /// 仅位置伺服模式计算，不驱动任何设备，只用于遥测。
    pub secondary_target: Option<f32>,
}

impl DriveOutputs {
    /// 全部停止的直接输出
    pub fn stopped() -> Self {
        Self {
            left: MotorCommand::PercentOutput(0.0),
            right: MotorCommand::PercentOutput(0.0),
            intake: Some(MotorCommand::PercentOutput(0.0)),
            secondary_target: None,
        }
    }

    /// 驱动命令所属的控制模式（以左侧为准）
    pub fn mode(&self) -> Option<ControlMode> {
        self.left.control_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::INTAKE_ID;

    #[test]
    fn test_control_mode_tag() {
        assert_eq!(
            MotorCommand::PercentOutput(0.5).control_mode(),
            Some(ControlMode::DirectOutput)
        );
        assert_eq!(
            MotorCommand::MotionMagic(4096.0).control_mode(),
            Some(ControlMode::PositionalServo)
        );
        assert_eq!(MotorCommand::Follow(INTAKE_ID).control_mode(), None);
        assert_eq!(MotorCommand::Neutral.control_mode(), None);
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(
            MotorCommand::for_mode(ControlMode::DirectOutput, 0.25),
            MotorCommand::PercentOutput(0.25)
        );
        assert_eq!(
            MotorCommand::for_mode(ControlMode::PositionalServo, -40960.0),
            MotorCommand::MotionMagic(-40960.0)
        );
    }

    #[test]
    fn test_value() {
        assert_eq!(MotorCommand::PercentOutput(-1.0).value(), Some(-1.0));
        assert_eq!(MotorCommand::Neutral.value(), None);
        assert!(MotorCommand::Follow(INTAKE_ID).is_follow());
    }

    #[test]
    fn test_stopped_outputs() {
        let outputs = DriveOutputs::stopped();
        assert_eq!(outputs.mode(), Some(ControlMode::DirectOutput));
        assert_eq!(outputs.intake, Some(MotorCommand::PercentOutput(0.0)));
        assert_eq!(outputs.secondary_target, None);
    }
}
