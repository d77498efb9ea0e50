//! Watchdog - 平台安全看门狗
//!
//! 平台约定：如果在超时时间内没有喂狗，所有执行器输出都会被禁用。
//! 控制循环只负责喂狗，禁用动作属于平台（或仿真平台）。
//!
//! 时间统一用"自时钟起点以来的单调时长"表示，由调用方传入，
//! 因此不依赖真实时间，便于测试。

use std::time::Duration;

/// 看门狗超时默认值
pub const DEFAULT_WATCHDOG_TIMEOUT: Duration = Duration::from_millis(100);

/// 安全看门狗
pub trait Watchdog {
    /// 喂狗
    fn feed(&mut self, now: Duration);

    /// 当前是否允许输出
    fn outputs_enabled(&mut self, now: Duration) -> bool;
}

/// 软件看门狗
///
/// 第一次喂狗之前输出处于禁用状态。
#[derive(Debug, Clone)]
pub struct SoftwareWatchdog {
    timeout: Duration,
    last_feed: Option<Duration>,
}

impl SoftwareWatchdog {
    /// 创建看门狗
    ///
    /// # 参数
    /// - `timeout`: 最后一次喂狗后保持使能的时长
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_feed: None,
        }
    }

    /// 超时时长
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 检查是否仍在有效期内
    pub fn is_alive(&self, now: Duration) -> bool {
        match self.last_feed {
            Some(last) => now.saturating_sub(last) < self.timeout,
            None => false,
        }
    }

    /// 距上次喂狗的时长（从未喂过返回 `None`）
    pub fn time_since_feed(&self, now: Duration) -> Option<Duration> {
        self.last_feed.map(|last| now.saturating_sub(last))
    }
}

impl Default for SoftwareWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_WATCHDOG_TIMEOUT)
    }
}

impl Watchdog for SoftwareWatchdog {
    fn feed(&mut self, now: Duration) {
        self.last_feed = Some(now);
    }

    fn outputs_enabled(&mut self, now: Duration) -> bool {
        self.is_alive(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_until_first_feed() {
        let mut watchdog = SoftwareWatchdog::new(Duration::from_millis(100));
        assert!(!watchdog.outputs_enabled(Duration::ZERO));
        assert_eq!(watchdog.time_since_feed(Duration::ZERO), None);

        watchdog.feed(Duration::from_millis(10));
        assert!(watchdog.outputs_enabled(Duration::from_millis(10)));
    }

    #[test]
    fn test_timeout_after_missed_feeds() {
        let mut watchdog = SoftwareWatchdog::new(Duration::from_millis(50));
        watchdog.feed(Duration::from_millis(0));

        assert!(watchdog.outputs_enabled(Duration::from_millis(49)));
        assert!(!watchdog.outputs_enabled(Duration::from_millis(50)));
        assert!(!watchdog.outputs_enabled(Duration::from_millis(100)));
    }

    #[test]
    fn test_feed_resets_timer() {
        let mut watchdog = SoftwareWatchdog::new(Duration::from_millis(100));
        watchdog.feed(Duration::from_millis(0));
        watchdog.feed(Duration::from_millis(80));

        assert!(watchdog.outputs_enabled(Duration::from_millis(150)));
        assert_eq!(
            watchdog.time_since_feed(Duration::from_millis(150)),
            Some(Duration::from_millis(70))
        );
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(SoftwareWatchdog::default().timeout(), DEFAULT_WATCHDOG_TIMEOUT);
    }
}
