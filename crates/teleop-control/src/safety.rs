//! 安全喂狗
//!
//! 手柄在线时每个周期喂一次看门狗；手柄断开后停止喂狗，
//! 由平台看门狗在超时后禁用所有输出。

use std::time::Duration;
use teleop_device::Watchdog;
use tracing::{info, warn};

/// 喂狗逻辑
#[derive(Debug, Clone, Default)]
pub struct SafetyFeed {
    /// 上一周期的手柄连接状态（首个周期之前为 `None`）
    last_connected: Option<bool>,
    feeds: u64,
}

impl SafetyFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行一次喂狗判断，返回本周期是否喂狗
    pub fn service<W: Watchdog + ?Sized>(
        &mut self,
        watchdog: &mut W,
        connected: bool,
        now: Duration,
    ) -> bool {
        if self.last_connected != Some(connected) {
            if connected {
                info!("Gamepad connected, feeding watchdog");
            } else {
                warn!("Gamepad disconnected, watchdog will disable outputs");
            }
            self.last_connected = Some(connected);
        }

        if connected {
            watchdog.feed(now);
            self.feeds += 1;
        }
        connected
    }

    /// 累计喂狗次数
    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teleop_device::SoftwareWatchdog;

    #[test]
    fn test_feeds_only_when_connected() {
        let mut feed = SafetyFeed::new();
        let mut watchdog = SoftwareWatchdog::new(Duration::from_millis(100));

        assert!(!feed.service(&mut watchdog, false, Duration::ZERO));
        assert!(!watchdog.outputs_enabled(Duration::ZERO));

        assert!(feed.service(&mut watchdog, true, Duration::from_millis(5)));
        assert!(watchdog.outputs_enabled(Duration::from_millis(5)));
        assert_eq!(feed.feeds(), 1);
    }

    #[test]
    fn test_outputs_time_out_after_disconnect() {
        let mut feed = SafetyFeed::new();
        let mut watchdog = SoftwareWatchdog::new(Duration::from_millis(100));

        feed.service(&mut watchdog, true, Duration::ZERO);
        for ms in (5..200).step_by(5) {
            feed.service(&mut watchdog, false, Duration::from_millis(ms));
        }
        assert_eq!(feed.feeds(), 1);
        assert!(watchdog.outputs_enabled(Duration::from_millis(99)));
        assert!(!watchdog.outputs_enabled(Duration::from_millis(100)));
    }
}
