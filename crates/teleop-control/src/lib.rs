//! 遥操作控制层
//!
//! 每个周期依次执行：
//!
//! ```text
//! InputSampler ──► select_mode ──► OutputMixer ──► Drivetrain::apply
//!                        │
//!                   SafetyFeed（手柄在线时喂狗）
//! ```
//!
//! 所有可变状态（当前模式、周期计数）都放在显式传递的 [`ControlContext`] 中，
//! 由 [`Teleop`] 独占。时间通过 [`Clock`] 注入，测试中使用 [`ManualClock`]
//! 即可在不真实休眠的情况下驱动固定频率循环。

pub mod clock;
pub mod context;
mod error;
pub mod loop_runner;
pub mod mixer;
pub mod mode_selector;
pub mod safety;
pub mod telemetry;
pub mod teleop;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::ControlContext;
pub use error::TeleopError;
pub use loop_runner::{LoopConfig, LoopSummary, StopFlag, run_loop};
pub use mixer::{MixerConfig, OutputMixer, cubic, intake_output};
pub use mode_selector::select_mode;
pub use safety::SafetyFeed;
pub use telemetry::TickReport;
pub use teleop::{Teleop, TeleopOptions};
