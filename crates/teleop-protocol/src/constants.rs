//! 遥操作相关常量定义
//!
//! 集中定义所有控制相关的常量，避免在代码中散落"魔法数"。

/// 摇杆死区阈值
///
/// 绝对值 ≤ 此阈值的摇杆采样被清零。
pub const DEFAULT_DEADBAND: f32 = 0.10;

/// 伺服模式比例尺（原生单位 / 满摇杆）
///
/// 4096 tick/圈 × 10 圈：满摇杆 ±1.0 对应 ±10 圈机械转动。
pub const SERVO_UNITS_PER_FULL_STICK: f32 = 40960.0;

/// 编码器每圈原生单位
pub const SENSOR_UNITS_PER_ROTATION: f32 = 4096.0;

/// 控制周期（毫秒）
pub const DEFAULT_TICK_PERIOD_MS: u64 = 5;

/// 参数写入超时（毫秒）
///
/// 启动配置阶段每次参数写入等待设备确认的最长时间。
pub const DEFAULT_CONFIG_TIMEOUT_MS: u64 = 50;

/// 默认闭环参数槽
pub const DEFAULT_PROFILE_SLOT: u8 = 0;

/// 默认主闭环索引
pub const PRIMARY_PID_INDEX: u8 = 0;

/// 参数槽数量（0..=3）
pub const PROFILE_SLOT_COUNT: u8 = 4;

/// 全输出时的传感器速度（原生单位 / 100ms）
pub const FULL_OUTPUT_SENSOR_VELOCITY: f32 = 8874.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servo_scale_is_ten_rotations() {
        assert_eq!(SERVO_UNITS_PER_FULL_STICK / SENSOR_UNITS_PER_ROTATION, 10.0);
    }
}
