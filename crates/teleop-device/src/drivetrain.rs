//! 坦克驱动系统
//!
//! 两组主从电机（左、右）加一个进料电机：
//!
//! ```text
//!   left_leader  ◄── Follow ── left_follower
//!   right_leader ◄── Follow ── right_follower
//!   intake
//! ```
//!
//! 主从关系只在启动时建立一次，运行期间不再改变；从电机不接收每周期命令。

use crate::{DeviceError, MotorController};
use std::time::Duration;
use teleop_protocol::{
    ConfigParam, DEFAULT_CONFIG_TIMEOUT_MS, DeviceId, DeviceIds, DriveOutputs, MotorCommand,
    MotorConfig, NeutralMode,
};
use tracing::{debug, info};

/// 驱动系统配置
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrivetrainConfig {
    pub ids: DeviceIds,
    /// 左侧主电机参数集
    pub left: MotorConfig,
    /// 右侧主电机参数集（未写出的字段取 [`MotorConfig::right_side`]）
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "teleop_protocol::deserialize_right_side")
    )]
    pub right: MotorConfig,
    /// 进料电机空档行为
    pub intake_neutral: NeutralMode,
    /// 单次参数写入超时（毫秒）
    pub config_timeout_ms: u64,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            ids: DeviceIds::default(),
            left: MotorConfig::default(),
            right: MotorConfig::right_side(),
            intake_neutral: NeutralMode::Brake,
            config_timeout_ms: DEFAULT_CONFIG_TIMEOUT_MS,
        }
    }
}

impl DrivetrainConfig {
    /// 检查配置
    pub fn validate(&self) -> Result<(), DeviceError> {
        if let Some(id) = self.ids.find_duplicate() {
            return Err(DeviceError::Rejected {
                id,
                reason: "device id assigned to more than one role".to_string(),
            });
        }
        self.left.validate()?;
        self.right.validate()?;
        Ok(())
    }

    pub fn config_timeout(&self) -> Duration {
        Duration::from_millis(self.config_timeout_ms)
    }
}

/// 驱动系统的设备句柄
pub struct DrivetrainDevices<M> {
    pub left_leader: M,
    pub left_follower: M,
    pub right_leader: M,
    pub right_follower: M,
    pub intake: M,
}

/// 左右主电机的传感器位置（原生单位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaderPositions {
    pub left: i32,
    pub right: i32,
}

/// 坦克驱动系统
pub struct Drivetrain<M: MotorController> {
    devices: DrivetrainDevices<M>,
    configured: bool,
    last_intake: Option<MotorCommand>,
}

impl<M: MotorController> Drivetrain<M> {
    /// 用设备句柄创建驱动系统（未配置）
    pub fn new(devices: DrivetrainDevices<M>) -> Self {
        Self {
            devices,
            configured: false,
            last_intake: None,
        }
    }

    /// 是否已完成启动配置
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// 进料电机最后一次收到的命令
    pub fn last_intake_command(&self) -> Option<MotorCommand> {
        self.last_intake
    }

    /// 执行启动配置序列
    ///
    /// 顺序：
    /// 1. 主电机选择反馈传感器与相位
    /// 2. 从电机恢复出厂设置
    /// 3. 主电机与进料电机设置空档行为
    /// 4. 主电机写入闭环增益、输出范围、Motion Magic 限制
    /// 5. 主电机传感器归零
    /// 6. 主电机再次写入传感器相位（右侧先写）
    /// 7. 从电机跟随各自的主电机
    ///
    /// 任何一次写入失败都会中止配置并返回错误。
    pub fn configure(&mut self, config: &DrivetrainConfig) -> Result<(), DeviceError> {
        config.validate()?;
        self.check_ids(&config.ids)?;

        let timeout = config.config_timeout();
        let d = &mut self.devices;

        info!(
            "Configuring drivetrain: left {} / {}, right {} / {}, intake {}",
            config.ids.left_leader,
            config.ids.left_follower,
            config.ids.right_leader,
            config.ids.right_follower,
            config.ids.intake
        );

        d.left_leader.write_params(&config.left.sensor_params(), timeout)?;
        d.right_leader.write_params(&config.right.sensor_params(), timeout)?;

        d.left_follower.write_param(ConfigParam::FactoryDefault, timeout)?;
        d.right_follower.write_param(ConfigParam::FactoryDefault, timeout)?;

        d.left_leader.write_param(config.left.neutral_param(), timeout)?;
        d.right_leader.write_param(config.right.neutral_param(), timeout)?;
        d.intake.write_param(ConfigParam::NeutralMode(config.intake_neutral), timeout)?;

        d.left_leader.write_params(&config.left.closed_loop_params(), timeout)?;
        d.right_leader.write_params(&config.right.closed_loop_params(), timeout)?;

        d.left_leader.write_param(config.left.home_param(), timeout)?;
        d.right_leader.write_param(config.right.home_param(), timeout)?;
        debug!(
            "Leader sensors homed to {} / {}",
            config.left.home_position, config.right.home_position
        );

        d.right_leader.write_param(config.right.phase_param(), timeout)?;
        d.left_leader.write_param(config.left.phase_param(), timeout)?;

        d.left_follower.set(MotorCommand::Follow(d.left_leader.id()))?;
        d.right_follower.set(MotorCommand::Follow(d.right_leader.id()))?;

        self.configured = true;
        info!("Drivetrain configured");
        Ok(())
    }

    /// 下发一个周期的驱动输出
    ///
    /// 只向主电机（以及存在时的进料电机）发送命令。
    pub fn apply(&mut self, outputs: &DriveOutputs) -> Result<(), DeviceError> {
        if !self.configured {
            return Err(DeviceError::NotConfigured);
        }

        self.devices.left_leader.set(outputs.left)?;
        self.devices.right_leader.set(outputs.right)?;

        if let Some(intake) = outputs.intake {
            self.devices.intake.set(intake)?;
            self.last_intake = Some(intake);
        }

        Ok(())
    }

    /// 读取左右主电机的传感器位置
    pub fn positions(&mut self) -> Result<LeaderPositions, DeviceError> {
        Ok(LeaderPositions {
            left: self.devices.left_leader.selected_sensor_position()?,
            right: self.devices.right_leader.selected_sensor_position()?,
        })
    }

    /// 取回设备句柄
    pub fn into_devices(self) -> DrivetrainDevices<M> {
        self.devices
    }

    fn check_ids(&self, ids: &DeviceIds) -> Result<(), DeviceError> {
        let d = &self.devices;
        let pairs: [(&'static str, DeviceId, DeviceId); 5] = [
            ("left_leader", ids.left_leader, d.left_leader.id()),
            ("left_follower", ids.left_follower, d.left_follower.id()),
            ("right_leader", ids.right_leader, d.right_leader.id()),
            ("right_follower", ids.right_follower, d.right_follower.id()),
            ("intake", ids.intake, d.intake.id()),
        ];
        for (role, expected, actual) in pairs {
            if expected != actual {
                return Err(DeviceError::IdMismatch {
                    role,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
