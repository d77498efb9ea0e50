//! Teleop SDK - 手柄遥操作坦克底盘
//!
//! 读取手柄，驱动两组主从电机（坦克驱动）和一个进料电机，
//! 在直接百分比输出和 Motion Magic 闭环位置控制之间切换。
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **协议层** (`protocol`): 设备 ID、控制模式、电机命令、参数集
//! - **设备层** (`device`): `MotorController` 契约、启动配置、`Drivetrain`、仿真总线
//! - **输入层** (`input`): `Gamepad` 契约、死区、采样、脚本回放
//! - **控制层** (`control`): 模式选择、输出混合、喂狗、固定频率循环
//! - **工具层** (`tools`): 配置文件与遥测录制
//!
//! # 快速开始
//!
//! ```rust
//! use teleop_sdk::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TeleopConfig::default();
//! let bus = SimBus::new();
//! let ids = config.drivetrain.ids;
//! let mut drivetrain = Drivetrain::new(DrivetrainDevices {
//!     left_leader: bus.device(ids.left_leader),
//!     left_follower: bus.device(ids.left_follower),
//!     right_leader: bus.device(ids.right_leader),
//!     right_follower: bus.device(ids.right_follower),
//!     intake: bus.device(ids.intake),
//! });
//! drivetrain.configure(&config.drivetrain)?;
//!
//! let script = InputScript::new(vec![ScriptStep::neutral(10).with_axis(1, -0.5)]);
//! let mut teleop = Teleop::new(
//!     drivetrain,
//!     ScriptedGamepad::new(script),
//!     SimWatchdog::new(bus.clone(), config.watchdog_timeout()),
//!     config.gamepad,
//!     config.teleop_options(),
//! )?;
//!
//! let clock = ManualClock::new();
//! let summary = run_loop(&mut teleop, &clock, &config.loop_config(Some(10)), None, |_| {})?;
//! assert_eq!(summary.ticks, 10);
//! # Ok(())
//! # }
//! ```

use std::sync::Once;

pub use teleop_control as control;
pub use teleop_device as device;
pub use teleop_input as input;
pub use teleop_protocol as protocol;
pub use teleop_tools as tools;

pub mod prelude;

// --- 常用类型 ---

pub use teleop_control::{
    Clock, ControlContext, LoopConfig, LoopSummary, ManualClock, StopFlag, SystemClock, Teleop,
    TeleopError, TeleopOptions, TickReport, run_loop,
};
pub use teleop_device::{DeviceError, Drivetrain, MotorController, Watchdog};
pub use teleop_input::{Gamepad, InputError};
pub use teleop_protocol::{ControlMode, DeviceId, MotorCommand, ProtocolError};
pub use teleop_tools::{ConfigError, TeleopConfig, TelemetryRecording};

static LOGGER: Once = Once::new();

/// 初始化日志
///
/// 安装 `tracing-subscriber` 的 fmt 输出，过滤规则来自 `RUST_LOG`（默认 `info`），
/// 并把 `log` crate 的记录桥接到 `tracing`。重复调用不会产生任何效果；
/// 如果进程内已经安装了其他全局 subscriber，也保持不变。
pub fn init_logger() {
    LOGGER.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

        let _ = tracing_log::LogTracer::init();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            log::debug!("Global tracing subscriber already installed");
        }
    });
}
