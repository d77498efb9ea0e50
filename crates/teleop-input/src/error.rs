//! 输入层错误类型定义

use thiserror::Error;

/// 输入层错误类型
#[derive(Error, Debug)]
pub enum InputError {
    /// 轴编号超出手柄范围
    #[error("Axis index {index} out of range (gamepad has {count} axes)")]
    AxisOutOfRange { index: usize, count: usize },

    /// 按键编号超出手柄范围（按键从 1 开始编号）
    #[error("Button index {index} out of range (valid: 1..={count})")]
    ButtonOutOfRange { index: usize, count: usize },

    /// 死区阈值非法
    #[error("Invalid deadband: {0} (must be in [0.0, 1.0))")]
    InvalidDeadband(f32),

    /// 手柄读取失败
    #[error("Gamepad read failed: {0}")]
    Device(String),

    /// 输入脚本解析失败
    #[cfg(feature = "serde")]
    #[error("Invalid input script: {0}")]
    Script(#[from] serde_json::Error),

    /// 文件 IO 错误
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::AxisOutOfRange { index: 9, count: 6 };
        assert_eq!(
            format!("{}", err),
            "Axis index 9 out of range (gamepad has 6 axes)"
        );

        let err = InputError::ButtonOutOfRange { index: 0, count: 12 };
        assert!(format!("{}", err).contains("1..=12"));

        let err = InputError::Device("usb host reset".to_string());
        assert!(format!("{}", err).contains("usb host reset"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: InputError = json_err.into();
        assert!(matches!(err, InputError::Script(_)));
    }
}
