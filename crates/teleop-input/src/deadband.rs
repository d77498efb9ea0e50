//! 死区变换
//!
//! 摇杆在中位附近的小幅偏移（漂移、噪声）被清零，防止意外运动。

/// 死区变换
///
/// - `|value| <= threshold`：返回精确的 `0.0`
/// - 否则原样返回
///
/// 非有限值（NaN）同样返回 `0.0`。
pub fn deadband(value: f32, threshold: f32) -> f32 {
    if value > threshold || value < -threshold {
        value
    } else {
        0.0
    }
}
