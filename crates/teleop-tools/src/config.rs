//! # 遥操作配置文件
//!
//! TOML 格式，所有字段都有默认值，缺省字段取默认值：
//!
//! ```toml
//! [drivetrain.ids]
//! left_leader = 1
//! left_follower = 3
//! right_leader = 0
//! right_follower = 2
//! intake = 12
//!
//! [drivetrain.left.gains]
//! kp = 0.55
//!
//! [gamepad]
//! deadband = 0.1
//!
//! [control]
//! period_ms = 5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use teleop_control::{LoopConfig, MixerConfig, TeleopOptions};
use teleop_device::DrivetrainConfig;
use teleop_device::watchdog::DEFAULT_WATCHDOG_TIMEOUT;
use teleop_input::GamepadMapping;
use teleop_protocol::DEFAULT_TICK_PERIOD_MS;
use thiserror::Error;
use tracing::debug;

/// 配置文件错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写失败
    #[error("Config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// TOML 解析失败
    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 配置值非法
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// 控制循环设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// 周期（毫秒）
    pub period_ms: u64,
    /// 直接输出模式下报告编码器位置
    pub report_positions: bool,
    /// 看门狗超时（毫秒）
    pub watchdog_timeout_ms: u64,
    /// 超时时打印警告
    pub overrun_warn: bool,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_TICK_PERIOD_MS,
            report_positions: true,
            watchdog_timeout_ms: DEFAULT_WATCHDOG_TIMEOUT.as_millis() as u64,
            overrun_warn: true,
        }
    }
}

/// 遥操作配置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopConfig {
    pub drivetrain: DrivetrainConfig,
    pub gamepad: GamepadMapping,
    pub mixer: MixerConfig,
    pub control: ControlSettings,
}

impl TeleopConfig {
    /// 从 TOML 字符串解析并检查
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// 从文件加载，文件不存在时返回默认配置
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// 保存到文件（自动创建父目录）
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    /// 检查配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| ConfigError::Invalid(e.to_string());

        if self.control.period_ms == 0 {
            return Err(ConfigError::Invalid(
                "control.period_ms must be > 0".to_string(),
            ));
        }
        if self.control.watchdog_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "control.watchdog_timeout_ms must be > 0".to_string(),
            ));
        }
        self.drivetrain.validate().map_err(|e| invalid(&e))?;
        self.gamepad.validate().map_err(|e| invalid(&e))?;
        self.mixer.validate().map_err(|e| invalid(&e))?;
        Ok(())
    }

    /// 周期流水线选项
    pub fn teleop_options(&self) -> TeleopOptions {
        TeleopOptions {
            mixer: self.mixer,
            report_positions: self.control.report_positions,
        }
    }

    /// 控制循环配置
    pub fn loop_config(&self, max_ticks: Option<u64>) -> LoopConfig {
        LoopConfig {
            period: Duration::from_millis(self.control.period_ms),
            max_ticks,
            overrun_warn: self.control.overrun_warn,
        }
    }

    pub fn watchdog_timeout(&self) -> Duration {
        Duration::from_millis(self.control.watchdog_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teleop_protocol::{DeviceId, FeedbackDevice, NeutralMode};

    #[test]
    fn test_defaults_match_firmware_constants() {
        let config = TeleopConfig::default();
        let dt = &config.drivetrain;

        assert_eq!(dt.ids.left_leader.as_u8(), 1);
        assert_eq!(dt.ids.left_follower.as_u8(), 3);
        assert_eq!(dt.ids.right_leader.as_u8(), 0);
        assert_eq!(dt.ids.right_follower.as_u8(), 2);
        assert_eq!(dt.ids.intake.as_u8(), 12);

        assert_eq!(dt.left.sensor, FeedbackDevice::QuadEncoder);
        assert!(!dt.left.sensor_phase);
        assert!(dt.right.sensor_phase);
        assert_eq!(dt.intake_neutral, NeutralMode::Brake);
        assert_eq!(dt.left.gains.kf, 0.0276);
        assert_eq!(dt.left.gains.kp, 0.55);
        assert_eq!(dt.left.gains.kd, 20.0);
        assert_eq!(dt.left.gains.integral_zone, 30);
        assert_eq!(dt.left.motion.cruise_velocity, 8000);
        assert_eq!(dt.left.motion.acceleration, 16000);
        assert_eq!(dt.config_timeout_ms, 50);

        assert_eq!(config.gamepad.deadband, 0.10);
        assert_eq!(config.mixer.servo_scale, 40960.0);
        assert_eq!(config.control.period_ms, 5);
        assert!(config.control.report_positions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_default() {
        let config = TeleopConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[control]"));
        assert_eq!(TeleopConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TeleopConfig::from_toml_str(
            r#"
[drivetrain.ids]
intake = 20

[drivetrain.left.gains]
kp = 0.8

[control]
period_ms = 10
"#,
        )
        .unwrap();

        assert_eq!(config.drivetrain.ids.intake, DeviceId::from_const(20));
        assert_eq!(config.drivetrain.ids.left_leader.as_u8(), 1);
        assert_eq!(config.drivetrain.left.gains.kp, 0.8);
        assert_eq!(config.drivetrain.left.gains.kd, 20.0);
        assert!(config.drivetrain.right.sensor_phase);
        assert_eq!(config.control.period_ms, 10);
        assert_eq!(config.loop_config(Some(3)).period, Duration::from_millis(10));
    }

    #[test]
    fn test_right_side_override_keeps_reversed_phase() {
        let config = TeleopConfig::from_toml_str("[drivetrain.right.gains]\nkp = 0.6\n").unwrap();
        let right = &config.drivetrain.right;
        assert!(right.sensor_phase);
        assert_eq!(right.gains.kp, 0.6);
        assert_eq!(right.gains.kd, 20.0);
        assert!(!config.drivetrain.left.sensor_phase);

        let config = TeleopConfig::from_toml_str("[drivetrain.right]\nhome_position = 100\n")
            .unwrap();
        assert!(config.drivetrain.right.sensor_phase);
        assert_eq!(config.drivetrain.right.home_position, 100);

        let config = TeleopConfig::from_toml_str("[drivetrain.right]\nsensor_phase = false\n")
            .unwrap();
        assert!(!config.drivetrain.right.sensor_phase);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            "[control]\nperiod_ms = 0",
            "[control]\nwatchdog_timeout_ms = 0",
            "[gamepad]\ndeadband = 1.5",
            "[gamepad]\nservo_mode_button = 13",
            "[mixer]\nservo_scale = -1.0",
            "[drivetrain.ids]\nintake = 1",
            "[drivetrain.left]\nprofile_slot = 4",
            "[drivetrain.left.output]\npeak_forward = 1.5",
            "[drivetrain.right.motion]\ncruise_velocity = 0",
        ];
        for case in cases {
            assert!(
                matches!(TeleopConfig::from_toml_str(case), Err(ConfigError::Invalid(_))),
                "expected invalid: {case}"
            );
        }
    }

    #[test]
    fn test_rejects_device_id_above_range() {
        let err = TeleopConfig::from_toml_str("[drivetrain.ids]\nintake = 63").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TeleopConfig::default();
        config.control.report_positions = false;
        config.save(&path).unwrap();

        let loaded = TeleopConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!loaded.teleop_options().report_positions);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TeleopConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, TeleopConfig::default());

        let err = TeleopConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
