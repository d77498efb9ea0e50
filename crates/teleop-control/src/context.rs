//! 控制循环上下文
//!
//! 由循环驱动者独占，按引用传给各个阶段。不跨进程持久化。

use teleop_input::ButtonSample;
use teleop_protocol::ControlMode;
use tracing::info;

use crate::select_mode;

/// 控制循环上下文
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlContext {
    /// 当前控制模式（启动时为直接输出）
    pub mode: ControlMode,
    /// 已完成的周期数
    pub tick: u64,
    /// 模式切换次数
    pub mode_changes: u64,
}

impl ControlContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据按键更新模式，返回模式是否改变
    pub fn update_mode(&mut self, buttons: &ButtonSample) -> bool {
        let next = select_mode(self.mode, buttons);
        if next == self.mode {
            return false;
        }
        info!("Control mode: {} -> {} (tick {})", self.mode, next, self.tick);
        self.mode = next;
        self.mode_changes += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_direct_output() {
        let ctx = ControlContext::new();
        assert_eq!(ctx.mode, ControlMode::DirectOutput);
        assert_eq!(ctx.tick, 0);
    }

    #[test]
    fn test_held_button_counts_one_change() {
        let mut ctx = ControlContext::new();
        let servo = ButtonSample {
            servo_mode: true,
            ..ButtonSample::default()
        };
        assert!(ctx.update_mode(&servo));
        assert!(!ctx.update_mode(&servo));
        assert!(!ctx.update_mode(&ButtonSample::default()));
        assert_eq!(ctx.mode, ControlMode::PositionalServo);
        assert_eq!(ctx.mode_changes, 1);
    }
}
