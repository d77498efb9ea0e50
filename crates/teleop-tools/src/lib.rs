//! # Teleop Tools - 共享文件格式
//!
//! ## 包含模块
//!
//! - `config` - TOML 配置文件（`TeleopConfig`）
//! - `recording` - 遥测录制格式（纯数据结构 + bincode）
//!
//! 不依赖任何硬件实现，应用层（CLI）和测试共用。

pub mod config;
pub mod recording;

pub use config::{ConfigError, ControlSettings, TeleopConfig};
pub use recording::{MAGIC, RecordingMetadata, TelemetryFrame, TelemetryRecording};
