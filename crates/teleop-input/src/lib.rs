//! 输入采样层
//!
//! 每个控制周期从手柄读取原始轴值与按键状态，并做死区过滤：
//!
//! - `Gamepad` trait：平台提供的 HID 手柄服务（每周期轮询一帧）
//! - `GamepadMapping`：轴与按键编号映射（可配置）
//! - `deadband()`：死区变换，不做平滑或限速
//! - `InputSampler`：把原始帧转换为 `InputSample`
//! - `ScriptedGamepad`：回放 JSON 输入脚本，用于测试和无硬件运行（需要 `serde` feature）

pub mod deadband;
mod error;
pub mod gamepad;
pub mod mapping;
pub mod sampler;
#[cfg(feature = "serde")]
pub mod scripted;

pub use deadband::deadband;
pub use error::InputError;
pub use gamepad::{AXIS_COUNT, BUTTON_COUNT, ConnectionStatus, Gamepad, GamepadFrame};
pub use mapping::GamepadMapping;
pub use sampler::{AxisSample, ButtonSample, InputSample, InputSampler};
#[cfg(feature = "serde")]
pub use scripted::{InputScript, ScriptStep, ScriptedGamepad};
