//! 设备启动参数定义
//!
//! 启动阶段对电机控制器的一次性参数写入。设备内部如何使用这些参数
//! （闭环计算、轨迹规划）不在本层范围内，这里只描述"写什么"。

use crate::constants::*;
use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

// ============================================================================
// 传感器与空档设置
// ============================================================================

/// 反馈传感器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FeedbackDevice {
    /// 正交编码器（默认）
    #[default]
    QuadEncoder = 0,
    /// 模拟量传感器（电位器等）
    Analog = 2,
    /// 磁编码器（相对值）
    MagEncoderRelative = 8,
    /// 磁编码器（绝对值）
    MagEncoderAbsolute = 9,
}

/// 空档行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NeutralMode {
    /// 保持设备当前设置
    EepromSetting = 0,
    /// 滑行
    Coast = 1,
    /// 刹车（默认）
    #[default]
    Brake = 2,
}

// ============================================================================
// 闭环参数
// ============================================================================

/// 参数槽内的闭环增益
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlotGains {
    pub kf: f32,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// 积分区（原生单位）
    pub integral_zone: u32,
}

impl Default for SlotGains {
    fn default() -> Self {
        Self {
            kf: 0.0276,
            kp: 0.55,
            ki: 0.0,
            kd: 20.0,
            integral_zone: 30,
        }
    }
}

impl SlotGains {
    /// 检查增益是否为有限非负值
    pub fn validate(&self) -> Result<(), ProtocolError> {
        for (field, value) in [
            ("kf", self.kf),
            ("kp", self.kp),
            ("ki", self.ki),
            ("kd", self.kd),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ProtocolError::out_of_range(
                    field,
                    value as f64,
                    "finite and >= 0",
                ));
            }
        }
        Ok(())
    }
}

/// 输出范围限制
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutputLimits {
    pub nominal_forward: f32,
    pub nominal_reverse: f32,
    pub peak_forward: f32,
    pub peak_reverse: f32,
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            nominal_forward: 0.0,
            nominal_reverse: 0.0,
            peak_forward: 1.0,
            peak_reverse: -1.0,
        }
    }
}

impl OutputLimits {
    /// 检查输出范围
    ///
    /// - 正向：`0 <= nominal <= peak <= 1`
    /// - 反向：`-1 <= peak <= nominal <= 0`
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !(0.0..=1.0).contains(&self.peak_forward) {
            return Err(ProtocolError::out_of_range(
                "peak_forward",
                self.peak_forward as f64,
                "[0.0, 1.0]",
            ));
        }
        if !(-1.0..=0.0).contains(&self.peak_reverse) {
            return Err(ProtocolError::out_of_range(
                "peak_reverse",
                self.peak_reverse as f64,
                "[-1.0, 0.0]",
            ));
        }
        if !(0.0..=self.peak_forward).contains(&self.nominal_forward) {
            return Err(ProtocolError::out_of_range(
                "nominal_forward",
                self.nominal_forward as f64,
                "[0.0, peak_forward]",
            ));
        }
        if !(self.peak_reverse..=0.0).contains(&self.nominal_reverse) {
            return Err(ProtocolError::out_of_range(
                "nominal_reverse",
                self.nominal_reverse as f64,
                "[peak_reverse, 0.0]",
            ));
        }
        Ok(())
    }
}

/// Motion Magic 轨迹限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionMagicLimits {
    /// 巡航速度（原生单位 / 100ms）
    pub cruise_velocity: u32,
    /// 加速度（原生单位 / 100ms / s）
    ///
    /// 16000 约 0.5s 达到 8000 的巡航速度。
    pub acceleration: u32,
}

impl Default for MotionMagicLimits {
    fn default() -> Self {
        Self {
            cruise_velocity: 8000,
            acceleration: 16000,
        }
    }
}

impl MotionMagicLimits {
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.cruise_velocity == 0 {
            return Err(ProtocolError::out_of_range("cruise_velocity", 0.0, "> 0"));
        }
        if self.acceleration == 0 {
            return Err(ProtocolError::out_of_range("acceleration", 0.0, "> 0"));
        }
        Ok(())
    }
}

// ============================================================================
// 参数写入
// ============================================================================

/// 单次参数写入
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigParam {
    /// 恢复出厂设置
    FactoryDefault,
    /// 选择反馈传感器
    FeedbackSensor {
        device: FeedbackDevice,
        pid_index: u8,
    },
    /// 传感器相位（true 表示反向）
    SensorPhase(bool),
    /// 空档行为
    NeutralMode(NeutralMode),
    Kf {
        slot: u8,
        value: f32,
    },
    Kp {
        slot: u8,
        value: f32,
    },
    Ki {
        slot: u8,
        value: f32,
    },
    Kd {
        slot: u8,
        value: f32,
    },
    IntegralZone {
        slot: u8,
        value: u32,
    },
    /// 选择闭环使用的参数槽
    SelectProfileSlot {
        slot: u8,
        pid_index: u8,
    },
    NominalOutputForward(f32),
    NominalOutputReverse(f32),
    PeakOutputForward(f32),
    PeakOutputReverse(f32),
    MotionCruiseVelocity(u32),
    MotionAcceleration(u32),
    /// 设置传感器当前位置（归零）
    SensorPosition(i32),
}

impl ConfigParam {
    /// 参数名称（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::FactoryDefault => "factory_default",
            Self::FeedbackSensor { .. } => "feedback_sensor",
            Self::SensorPhase(_) => "sensor_phase",
            Self::NeutralMode(_) => "neutral_mode",
            Self::Kf { .. } => "kf",
            Self::Kp { .. } => "kp",
            Self::Ki { .. } => "ki",
            Self::Kd { .. } => "kd",
            Self::IntegralZone { .. } => "integral_zone",
            Self::SelectProfileSlot { .. } => "select_profile_slot",
            Self::NominalOutputForward(_) => "nominal_output_forward",
            Self::NominalOutputReverse(_) => "nominal_output_reverse",
            Self::PeakOutputForward(_) => "peak_output_forward",
            Self::PeakOutputReverse(_) => "peak_output_reverse",
            Self::MotionCruiseVelocity(_) => "motion_cruise_velocity",
            Self::MotionAcceleration(_) => "motion_acceleration",
            Self::SensorPosition(_) => "sensor_position",
        }
    }
}

// ============================================================================
// 主电机参数集
// ============================================================================

/// 主电机（闭环）参数集
///
/// 从电机不需要参数集：它们只恢复出厂设置并跟随主电机。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotorConfig {
    pub sensor: FeedbackDevice,
    /// 传感器相位：保证正输出时传感器读数增加
    pub sensor_phase: bool,
    pub neutral_mode: NeutralMode,
    pub profile_slot: u8,
    pub gains: SlotGains,
    pub output: OutputLimits,
    pub motion: MotionMagicLimits,
    /// 启动时写入的传感器位置（位置伺服的原点）
    pub home_position: i32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            sensor: FeedbackDevice::QuadEncoder,
            sensor_phase: false,
            neutral_mode: NeutralMode::Brake,
            profile_slot: DEFAULT_PROFILE_SLOT,
            gains: SlotGains::default(),
            output: OutputLimits::default(),
            motion: MotionMagicLimits::default(),
            home_position: 0,
        }
    }
}

impl MotorConfig {
    /// 右侧默认参数集（传感器反向）
    pub fn right_side() -> Self {
        Self {
            sensor_phase: true,
            ..Self::default()
        }
    }

    /// 检查参数集
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.profile_slot >= PROFILE_SLOT_COUNT {
            return Err(ProtocolError::InvalidValue {
                field: "profile_slot".to_string(),
                value: self.profile_slot,
            });
        }
        self.gains.validate()?;
        self.output.validate()?;
        self.motion.validate()
    }

    /// 传感器选择与相位
    pub fn sensor_params(&self) -> Vec<ConfigParam> {
        vec![
            ConfigParam::FeedbackSensor {
                device: self.sensor,
                pid_index: PRIMARY_PID_INDEX,
            },
            self.phase_param(),
        ]
    }

    /// 传感器相位
    ///
    /// 启动时写入两次：选择传感器之后，以及归零之后。
    pub fn phase_param(&self) -> ConfigParam {
        ConfigParam::SensorPhase(self.sensor_phase)
    }

    /// 空档行为
    pub fn neutral_param(&self) -> ConfigParam {
        ConfigParam::NeutralMode(self.neutral_mode)
    }

    /// 闭环增益、输出范围与 Motion Magic 限制
    pub fn closed_loop_params(&self) -> Vec<ConfigParam> {
        let slot = self.profile_slot;
        vec![
            ConfigParam::Kf {
                slot,
                value: self.gains.kf,
            },
            ConfigParam::Kp {
                slot,
                value: self.gains.kp,
            },
            ConfigParam::Ki {
                slot,
                value: self.gains.ki,
            },
            ConfigParam::Kd {
                slot,
                value: self.gains.kd,
            },
            ConfigParam::IntegralZone {
                slot,
                value: self.gains.integral_zone,
            },
            ConfigParam::SelectProfileSlot {
                slot,
                pid_index: PRIMARY_PID_INDEX,
            },
            ConfigParam::NominalOutputForward(self.output.nominal_forward),
            ConfigParam::NominalOutputReverse(self.output.nominal_reverse),
            ConfigParam::PeakOutputForward(self.output.peak_forward),
            ConfigParam::PeakOutputReverse(self.output.peak_reverse),
            ConfigParam::MotionCruiseVelocity(self.motion.cruise_velocity),
            ConfigParam::MotionAcceleration(self.motion.acceleration),
        ]
    }

    /// 归零
    pub fn home_param(&self) -> ConfigParam {
        ConfigParam::SensorPosition(self.home_position)
    }

    /// 单个主电机的完整写入序列
    pub fn leader_params(&self) -> Vec<ConfigParam> {
        let mut params = self.sensor_params();
        params.push(self.neutral_param());
        params.extend(self.closed_loop_params());
        params.push(self.home_param());
        params.push(self.phase_param());
        params
    }
}

/// 参数集的部分覆盖（配置文件中未出现的字段为 `None`）
#[cfg(feature = "serde")]
#[derive(Debug, Default, serde::Deserialize)]
struct MotorConfigOverrides {
    sensor: Option<FeedbackDevice>,
    sensor_phase: Option<bool>,
    neutral_mode: Option<NeutralMode>,
    profile_slot: Option<u8>,
    gains: Option<SlotGains>,
    output: Option<OutputLimits>,
    motion: Option<MotionMagicLimits>,
    home_position: Option<i32>,
}

#[cfg(feature = "serde")]
impl MotorConfigOverrides {
    fn apply(self, base: MotorConfig) -> MotorConfig {
        MotorConfig {
            sensor: self.sensor.unwrap_or(base.sensor),
            sensor_phase: self.sensor_phase.unwrap_or(base.sensor_phase),
            neutral_mode: self.neutral_mode.unwrap_or(base.neutral_mode),
            profile_slot: self.profile_slot.unwrap_or(base.profile_slot),
            gains: self.gains.unwrap_or(base.gains),
            output: self.output.unwrap_or(base.output),
            motion: self.motion.unwrap_or(base.motion),
            home_position: self.home_position.unwrap_or(base.home_position),
        }
    }
}

/// 以 [`MotorConfig::right_side`] 为基准反序列化参数集
///
/// 配置文件只覆盖右侧的部分字段时，未出现的字段（包括传感器相位）
/// 保持右侧默认值，而不是 [`MotorConfig::default`]。
#[cfg(feature = "serde")]
pub fn deserialize_right_side<'de, D>(deserializer: D) -> Result<MotorConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    MotorConfigOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply(MotorConfig::right_side()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gains() {
        let gains = SlotGains::default();
        assert_eq!(gains.kf, 0.0276);
        assert_eq!(gains.kp, 0.55);
        assert_eq!(gains.ki, 0.0);
        assert_eq!(gains.kd, 20.0);
        assert_eq!(gains.integral_zone, 30);
        assert!(gains.validate().is_ok());
    }

    #[test]
    fn test_gains_reject_non_finite() {
        let gains = SlotGains {
            kp: f32::NAN,
            ..SlotGains::default()
        };
        assert!(gains.validate().is_err());

        let gains = SlotGains {
            kd: -1.0,
            ..SlotGains::default()
        };
        assert!(gains.validate().is_err());
    }

    #[test]
    fn test_output_limits_validation() {
        assert!(OutputLimits::default().validate().is_ok());

        let limits = OutputLimits {
            peak_forward: 1.5,
            ..OutputLimits::default()
        };
        assert!(limits.validate().is_err());

        let limits = OutputLimits {
            peak_reverse: 0.5,
            ..OutputLimits::default()
        };
        assert!(limits.validate().is_err());

        let limits = OutputLimits {
            nominal_forward: 0.8,
            peak_forward: 0.5,
            ..OutputLimits::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_motion_limits_validation() {
        assert!(MotionMagicLimits::default().validate().is_ok());
        let limits = MotionMagicLimits {
            cruise_velocity: 0,
            acceleration: 16000,
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_profile_slot_validation() {
        let config = MotorConfig {
            profile_slot: 4,
            ..MotorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ProtocolError::InvalidValue {
                field: "profile_slot".to_string(),
                value: 4
            })
        );
    }

    #[test]
    fn test_right_side_phase() {
        assert!(!MotorConfig::default().sensor_phase);
        assert!(MotorConfig::right_side().sensor_phase);
    }

    #[test]
    fn test_leader_param_order() {
        let params = MotorConfig::default().leader_params();
        let names: Vec<_> = params.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "feedback_sensor",
                "sensor_phase",
                "neutral_mode",
                "kf",
                "kp",
                "ki",
                "kd",
                "integral_zone",
                "select_profile_slot",
                "nominal_output_forward",
                "nominal_output_reverse",
                "peak_output_forward",
                "peak_output_reverse",
                "motion_cruise_velocity",
                "motion_acceleration",
                "sensor_position",
                "sensor_phase",
            ]
        );
        assert_eq!(params[params.len() - 2], ConfigParam::SensorPosition(0));
        assert_eq!(params.last(), Some(&ConfigParam::SensorPhase(false)));
    }

    #[test]
    fn test_enum_conversions() {
        assert_eq!(u8::from(FeedbackDevice::QuadEncoder), 0);
        assert_eq!(
            FeedbackDevice::try_from(8u8).unwrap(),
            FeedbackDevice::MagEncoderRelative
        );
        assert!(FeedbackDevice::try_from(3u8).is_err());
        assert_eq!(NeutralMode::try_from(2u8).unwrap(), NeutralMode::Brake);
    }
}
