//! 设备执行层
//!
//! 本模块提供电机控制器的抽象与驱动系统的执行逻辑，包括：
//! - `MotorController` trait：厂商电机控制器的不透明契约（参数写入、命令下发、位置读取）
//! - `Drivetrain`：两组主从电机（坦克驱动）加一个进料电机
//! - 启动配置序列：按固定顺序写入传感器、闭环、Motion Magic 参数并建立主从跟随
//! - `Watchdog` trait：平台安全看门狗（超时未喂狗则禁用所有输出）
//! - `SimBus`：仿真设备总线，用于测试和无硬件运行
//!
//! # 错误语义
//!
//! 所有设备调用都返回 `Result`。本层不做重试：任何故障都原样上抛，
//! 由控制循环作为致命错误终止运行。

pub mod controller;
pub mod drivetrain;
mod error;
pub mod sim;
pub mod watchdog;

pub use controller::MotorController;
pub use drivetrain::{Drivetrain, DrivetrainConfig, DrivetrainDevices, LeaderPositions};
pub use error::DeviceError;
pub use sim::{SimBus, SimDeviceSnapshot, SimMotorController, SimWatchdog};
pub use watchdog::{SoftwareWatchdog, Watchdog};
