//! 可注入时钟
//!
//! 时间统一表示为"自时钟起点以来的时长"（`Duration`）。
//!
//! - [`SystemClock`]：单调时钟 + `spin_sleep` 低抖动休眠
//! - [`ManualClock`]：手动推进的时钟，`sleep_until` 直接把时间拨到截止点，
//!   测试中固定频率循环不需要真实等待

use spin_sleep::SpinSleeper;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 时钟
pub trait Clock {
    /// 当前时间
    fn now(&self) -> Duration;

    /// 休眠到指定时间（已过期则立即返回）
    fn sleep_until(&self, deadline: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep_until(&self, deadline: Duration) {
        (**self).sleep_until(deadline)
    }
}

/// 系统单调时钟
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    sleeper: SpinSleeper,
}

impl SystemClock {
    /// 以当前时刻为起点创建时钟
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            sleeper: SpinSleeper::default(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            self.sleeper.sleep(deadline - now);
        }
    }
}

/// 手动时钟
///
/// 克隆体共享同一时间，可以在观察者回调中推进时间来模拟耗时。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进时间
    pub fn advance(&self, delta: Duration) {
        self.nanos.fetch_add(duration_nanos(delta), Ordering::SeqCst);
    }

    /// 设置时间（只允许向前）
    pub fn set(&self, now: Duration) {
        self.nanos.fetch_max(duration_nanos(now), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep_until(&self, deadline: Duration) {
        self.set(deadline);
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
