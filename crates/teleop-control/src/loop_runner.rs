//! 固定频率控制循环
//!
//! 使用绝对时间锚点（`start + n * period`）消除累积漂移：
//!
//! ```text
//! next = start
//! loop {
//!     next += period
//!     tick(now)
//!     if next > now { sleep_until(next) }
//!     else          { overrun: warn, next = now }
//! }
//! ```
//!
//! 超时（overrun）时不会连续补发多个周期，而是把锚点重置到当前时间。
//!
//! # 停止条件
//!
//! - 达到 `max_ticks`
//! - [`StopFlag`] 被置位（例如 Ctrl+C）
//! - 周期返回错误（设备或输入故障，立即返回）

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use teleop_device::{MotorController, Watchdog};
use teleop_input::Gamepad;
use teleop_protocol::{ControlMode, DEFAULT_TICK_PERIOD_MS};
use tracing::{error, info, warn};

use crate::{Clock, Teleop, TeleopError, TickReport};

/// 控制循环配置
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// 周期
    pub period: Duration,
    /// 最大周期数（`None` 表示一直运行到停止）
    pub max_ticks: Option<u64>,
    /// 超时时是否打印警告
    pub overrun_warn: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(DEFAULT_TICK_PERIOD_MS),
            max_ticks: None,
            overrun_warn: true,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), TeleopError> {
        if self.period.is_zero() {
            return Err(TeleopError::Config(
                "Invalid loop period: 0 (must be > 0)".to_string(),
            ));
        }
        if self.period < Duration::from_micros(100) {
            warn!(
                "Very short loop period: {:?}. This may cause performance issues.",
                self.period
            );
        }
        Ok(())
    }
}

/// 停止标志
///
/// 克隆体共享同一标志，可以交给信号处理函数。
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求停止
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 运行统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSummary {
    /// 已执行的周期数
    pub ticks: u64,
    /// 超时次数
    pub overruns: u64,
    /// 喂狗次数
    pub feeds: u64,
    /// 模式切换次数
    pub mode_changes: u64,
    /// 结束时的控制模式
    pub final_mode: ControlMode,
    /// 运行时长（按注入的时钟）
    pub elapsed: Duration,
    /// 是否因停止标志结束
    pub stopped: bool,
}

/// 运行控制循环
///
/// 阻塞直到达到 `max_ticks`、停止标志被置位或发生错误。
/// `observer` 在每个周期结束后收到该周期的报告。
///
/// # 返回
///
/// - `Ok(LoopSummary)`: 正常结束
/// - `Err(TeleopError)`: 周期出错，后续周期不再执行
pub fn run_loop<M, G, W, C, F>(
    teleop: &mut Teleop<M, G, W>,
    clock: &C,
    config: &LoopConfig,
    stop: Option<&StopFlag>,
    mut observer: F,
) -> Result<LoopSummary, TeleopError>
where
    M: MotorController,
    G: Gamepad,
    W: Watchdog,
    C: Clock + ?Sized,
    F: FnMut(&TickReport),
{
    config.validate()?;

    let start = clock.now();
    let mut next_tick = start;
    let mut summary = LoopSummary::default();

    info!(
        "Control loop started: period {:?}, max ticks {:?}",
        config.period, config.max_ticks
    );

    loop {
        if let Some(max) = config.max_ticks
            && summary.ticks >= max
        {
            break;
        }
        if stop.is_some_and(StopFlag::is_stopped) {
            info!("Stop requested after {} ticks", summary.ticks);
            summary.stopped = true;
            break;
        }

        // 1. 设定下一个锚点
        next_tick += config.period;

        // 2. 执行周期
        let report = match teleop.tick(clock.now()) {
            Ok(report) => report,
            Err(e) => {
                error!("Tick {} failed: {}", summary.ticks, e);
                return Err(e);
            },
        };
        summary.ticks += 1;
        observer(&report);

        // 3. 睡眠到下一个锚点
        let now = clock.now();
        if next_tick > now {
            clock.sleep_until(next_tick);
        } else {
            summary.overruns += 1;
            if config.overrun_warn {
                warn!(
                    "Control loop overrun: tick took {:?} (period {:?}), re-anchoring",
                    now.saturating_sub(next_tick.saturating_sub(config.period)),
                    config.period
                );
            }
            next_tick = now;
        }
    }

    summary.feeds = teleop.feeds();
    summary.mode_changes = teleop.context().mode_changes;
    summary.final_mode = teleop.context().mode;
    summary.elapsed = clock.now().saturating_sub(start);

    info!(
        "Control loop finished: {} ticks, {} overruns, {} feeds, {} mode changes",
        summary.ticks, summary.overruns, summary.feeds, summary.mode_changes
    );
    Ok(summary)
}
