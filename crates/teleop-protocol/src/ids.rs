//! 设备 ID 定义
//!
//! 电机控制器在总线上的设备编号。

use crate::ProtocolError;
use std::fmt;

/// 设备 ID（0..=62）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct DeviceId(u8);

impl DeviceId {
    /// 最大合法设备 ID
    pub const MAX: u8 = 62;

    /// 创建设备 ID
    ///
    /// 超出 `0..=62` 时返回 `ProtocolError::InvalidDeviceId`。
    pub fn new(id: u8) -> Result<Self, ProtocolError> {
        if id > Self::MAX {
            return Err(ProtocolError::InvalidDeviceId { id, max: Self::MAX });
        }
        Ok(Self(id))
    }

    /// 编译期常量构造（调用方保证范围合法）
    pub const fn from_const(id: u8) -> Self {
        assert!(id <= Self::MAX, "device id out of range");
        Self(id)
    }

    /// 获取原始编号
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DeviceId {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for u8 {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 左侧主电机默认 ID
pub const LEFT_LEADER_ID: DeviceId = DeviceId::from_const(1);
/// 左侧从电机默认 ID
pub const LEFT_FOLLOWER_ID: DeviceId = DeviceId::from_const(3);
/// 右侧主电机默认 ID
pub const RIGHT_LEADER_ID: DeviceId = DeviceId::from_const(0);
/// 右侧从电机默认 ID
pub const RIGHT_FOLLOWER_ID: DeviceId = DeviceId::from_const(2);
/// 进料电机默认 ID
pub const INTAKE_ID: DeviceId = DeviceId::from_const(12);

/// 驱动系统设备 ID 分配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceIds {
    pub left_leader: DeviceId,
    pub left_follower: DeviceId,
    pub right_leader: DeviceId,
    pub right_follower: DeviceId,
    pub intake: DeviceId,
}

impl Default for DeviceIds {
    fn default() -> Self {
        Self {
            left_leader: LEFT_LEADER_ID,
            left_follower: LEFT_FOLLOWER_ID,
            right_leader: RIGHT_LEADER_ID,
            right_follower: RIGHT_FOLLOWER_ID,
            intake: INTAKE_ID,
        }
    }
}

impl DeviceIds {
    /// 按固定顺序列出所有 ID
    pub fn all(&self) -> [DeviceId; 5] {
        [
            self.left_leader,
            self.left_follower,
            self.right_leader,
            self.right_follower,
            self.intake,
        ]
    }

    /// 检查 ID 是否重复
    ///
    /// 返回第一个重复的 ID。
    pub fn find_duplicate(&self) -> Option<DeviceId> {
        let all = self.all();
        for (i, id) in all.iter().enumerate() {
            if all[i + 1..].contains(id) {
                return Some(*id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_range() {
        assert_eq!(DeviceId::new(0).unwrap().as_u8(), 0);
        assert_eq!(DeviceId::new(62).unwrap().as_u8(), 62);
        assert_eq!(
            DeviceId::new(63),
            Err(ProtocolError::InvalidDeviceId { id: 63, max: 62 })
        );
        assert!(DeviceId::try_from(255).is_err());
    }

    #[test]
    fn test_default_ids() {
        let ids = DeviceIds::default();
        assert_eq!(ids.left_leader.as_u8(), 1);
        assert_eq!(ids.left_follower.as_u8(), 3);
        assert_eq!(ids.right_leader.as_u8(), 0);
        assert_eq!(ids.right_follower.as_u8(), 2);
        assert_eq!(ids.intake.as_u8(), 12);
        assert_eq!(ids.find_duplicate(), None);
    }

    #[test]
    fn test_find_duplicate() {
        let ids = DeviceIds {
            intake: LEFT_LEADER_ID,
            ..DeviceIds::default()
        };
        assert_eq!(ids.find_duplicate(), Some(LEFT_LEADER_ID));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", INTAKE_ID), "#12");
    }
}
