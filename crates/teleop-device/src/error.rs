//! 设备层错误类型定义

use teleop_protocol::{DeviceId, ProtocolError};
use thiserror::Error;

/// 设备层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    /// 参数或 ID 非法
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 总线上找不到设备
    #[error("Device {0} not found")]
    NotFound(DeviceId),

    /// 参数写入超时
    #[error("Device {id}: timeout writing {param}")]
    Timeout { id: DeviceId, param: &'static str },

    /// 设备报告故障
    #[error("Device {id} fault: {message}")]
    Fault { id: DeviceId, message: String },

    /// 设备拒绝命令
    #[error("Device {id} rejected command: {reason}")]
    Rejected { id: DeviceId, reason: String },

    /// 设备句柄与配置的 ID 不一致
    #[error("Device id mismatch for {role}: expected {expected}, got {actual}")]
    IdMismatch {
        role: &'static str,
        expected: DeviceId,
        actual: DeviceId,
    },

    /// 未完成启动配置就下发命令
    #[error("Drivetrain not configured")]
    NotConfigured,
}

impl DeviceError {
    /// 出错的设备（如果能确定）
    pub fn device(&self) -> Option<DeviceId> {
        match self {
            Self::NotFound(id) => Some(*id),
            Self::Timeout { id, .. } | Self::Fault { id, .. } | Self::Rejected { id, .. } => {
                Some(*id)
            },
            Self::IdMismatch { actual, .. } => Some(*actual),
            Self::Protocol(_) | Self::NotConfigured => None,
        }
    }
}
