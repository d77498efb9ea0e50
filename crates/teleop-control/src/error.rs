//! 控制层错误类型定义

use teleop_device::DeviceError;
use teleop_input::InputError;
use thiserror::Error;

/// 控制层错误类型
///
/// 周期内的设备错误和输入错误都是致命的：控制循环立即返回，不做重试。
#[derive(Error, Debug)]
pub enum TeleopError {
    /// 设备错误
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// 输入错误
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TeleopError {
    /// 是否来自设备层
    pub fn is_device(&self) -> bool {
        matches!(self, Self::Device(_))
    }
}
