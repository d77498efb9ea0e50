//! # Teleop Protocol
//!
//! 遥操作各层共享的数据类型定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 设备 ID 定义
//! - `constants`: 协议常量定义（死区、伺服比例等）
//! - `mode`: 控制模式（直接输出 / 位置伺服）
//! - `command`: 电机命令（带类型标签的变体）
//! - `config`: 设备启动参数集
//!
//! ## 单位约定
//!
//! - 直接输出模式：无量纲百分比，范围 `[-1.0, 1.0]`
//! - 位置伺服模式：传感器原生单位（编码器 tick）

pub mod command;
pub mod config;
pub mod constants;
pub mod ids;
pub mod mode;

// 重新导出常用类型
pub use command::*;
pub use config::*;
pub use constants::*;
pub use ids::*;
pub use mode::*;

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid device id: {id} (must be 0..={max})")]
    InvalidDeviceId { id: u8, max: u8 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },

    #[error("Parameter {field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: String,
        value: f64,
        expected: String,
    },
}

impl ProtocolError {
    /// 构造范围错误
    pub fn out_of_range(field: &str, value: f64, expected: &str) -> Self {
        Self::OutOfRange {
            field: field.to_string(),
            value,
            expected: expected.to_string(),
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_device_id_json_range_checked() {
        let id: DeviceId = serde_json::from_str("12").unwrap();
        assert_eq!(id, INTAKE_ID);
        assert_eq!(serde_json::to_string(&RIGHT_LEADER_ID).unwrap(), "0");

        let err = serde_json::from_str::<DeviceId>("63").unwrap_err();
        assert!(err.to_string().contains("Invalid device id: 63"));
    }

    #[test]
    fn test_motor_command_json() {
        let json = serde_json::to_string(&MotorCommand::Follow(LEFT_LEADER_ID)).unwrap();
        assert_eq!(json, r#"{"Follow":1}"#);

        let cmd: MotorCommand = serde_json::from_str(r#"{"PercentOutput":0.125}"#).unwrap();
        assert_eq!(cmd, MotorCommand::PercentOutput(0.125));
        assert_eq!(cmd.control_mode(), Some(ControlMode::DirectOutput));

        let cmd: MotorCommand = serde_json::from_str(r#""Neutral""#).unwrap();
        assert_eq!(cmd, MotorCommand::Neutral);

        assert!(serde_json::from_str::<MotorCommand>(r#"{"Follow":99}"#).is_err());
    }

    #[test]
    fn test_control_mode_json() {
        let json = serde_json::to_string(&ControlMode::PositionalServo).unwrap();
        assert_eq!(json, r#""PositionalServo""#);
        let mode: ControlMode = serde_json::from_str(r#""DirectOutput""#).unwrap();
        assert_eq!(mode, ControlMode::DirectOutput);
    }

    #[derive(Deserialize)]
    struct RightSide {
        #[serde(deserialize_with = "deserialize_right_side")]
        right: MotorConfig,
    }

    #[test]
    fn test_right_side_partial_override_keeps_phase() {
        let parsed: RightSide =
            serde_json::from_str(r#"{"right": {"gains": {"kp": 0.6}}}"#).unwrap();
        assert!(parsed.right.sensor_phase);
        assert_eq!(parsed.right.gains.kp, 0.6);
        assert_eq!(parsed.right.gains.kd, SlotGains::default().kd);

        let parsed: RightSide = serde_json::from_str(r#"{"right": {}}"#).unwrap();
        assert_eq!(parsed.right, MotorConfig::right_side());
    }

    #[test]
    fn test_right_side_explicit_phase_wins() {
        let parsed: RightSide =
            serde_json::from_str(r#"{"right": {"sensor_phase": false, "home_position": 5}}"#)
                .unwrap();
        assert!(!parsed.right.sensor_phase);
        assert_eq!(parsed.right.home_position, 5);
    }
}
