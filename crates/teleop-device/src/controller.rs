//! 电机控制器契约
//!
//! 厂商电机控制器内部的闭环计算、轨迹规划、总线传输都不属于本层。
//! 本层只依赖三类操作：
//!
//! - 启动阶段的参数写入（带超时）
//! - 每周期的命令下发（"在模式 M 下设置命令 C"）
//! - 可选的传感器位置读取（诊断用）

use crate::DeviceError;
use std::time::Duration;
use teleop_protocol::{ConfigParam, DeviceId, MotorCommand};

/// 电机控制器
///
/// 命令下发是"发出即忘"：返回 `Ok` 只表示命令被接受，不代表设备已执行。
pub trait MotorController {
    /// 设备 ID
    fn id(&self) -> DeviceId;

    /// 写入一个启动参数
    ///
    /// `timeout` 为等待设备确认的最长时间，超时返回 `DeviceError::Timeout`。
    fn write_param(&mut self, param: ConfigParam, timeout: Duration) -> Result<(), DeviceError>;

    /// 下发命令
    fn set(&mut self, command: MotorCommand) -> Result<(), DeviceError>;

    /// 读取已选传感器的当前位置（原生单位）
    fn selected_sensor_position(&mut self) -> Result<i32, DeviceError>;

    /// 按顺序写入一组参数，遇到第一个错误即停止
    fn write_params(
        &mut self,
        params: &[ConfigParam],
        timeout: Duration,
    ) -> Result<(), DeviceError> {
        for param in params {
            self.write_param(*param, timeout)?;
        }
        Ok(())
    }
}

impl<T: MotorController + ?Sized> MotorController for Box<T> {
    fn id(&self) -> DeviceId {
        (**self).id()
    }

    fn write_param(&mut self, param: ConfigParam, timeout: Duration) -> Result<(), DeviceError> {
        (**self).write_param(param, timeout)
    }

    fn set(&mut self, command: MotorCommand) -> Result<(), DeviceError> {
        (**self).set(command)
    }

    fn selected_sensor_position(&mut self) -> Result<i32, DeviceError> {
        (**self).selected_sensor_position()
    }
}
