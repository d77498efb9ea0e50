//! 仿真设备总线
//!
//! 在没有硬件时替代真实的电机控制器，用于测试和 CLI 演示。
//!
//! # 仿真模型
//!
//! 这不是厂商固件的复刻，只是一个足够检验遥操作逻辑的简化模型：
//!
//! - 百分比输出：传感器速度 = 输出 × 空载速度（原生单位 / 100ms），按传感器相位取符号
//! - Motion Magic：以巡航速度匀速逼近目标位置（不模拟加减速）
//! - 跟随：从电机的实际输出等于其主电机的实际输出
//! - 输出禁用（看门狗超时）：所有设备实际输出为 0
//!
//! # 共享
//!
//! `SimBus` 可以廉价克隆，所有克隆和 `SimMotorController` 句柄共享同一份状态
//! （`parking_lot::Mutex`，无 Poison）。

use crate::watchdog::{SoftwareWatchdog, Watchdog};
use crate::{DeviceError, MotorController};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use teleop_protocol::{
    ConfigParam, DeviceId, FULL_OUTPUT_SENSOR_VELOCITY, MotionMagicLimits, MotorCommand,
    NeutralMode,
};
use tracing::{trace, warn};

/// 跟随链的最大深度（防止配置成环时死循环）
const MAX_FOLLOW_DEPTH: usize = 8;

/// 单个仿真设备的状态
#[derive(Debug, Clone)]
struct SimDevice {
    params: Vec<ConfigParam>,
    last_command: MotorCommand,
    command_count: usize,
    position: f64,
    sensor_phase: bool,
    neutral_mode: NeutralMode,
    cruise_velocity: u32,
    applied_output: f32,
    fault: Option<String>,
}

impl Default for SimDevice {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            last_command: MotorCommand::Neutral,
            command_count: 0,
            position: 0.0,
            sensor_phase: false,
            neutral_mode: NeutralMode::EepromSetting,
            cruise_velocity: MotionMagicLimits::default().cruise_velocity,
            applied_output: 0.0,
            fault: None,
        }
    }
}

impl SimDevice {
    fn apply_param(&mut self, param: ConfigParam) {
        match param {
            ConfigParam::FactoryDefault => {
                self.sensor_phase = false;
                self.neutral_mode = NeutralMode::EepromSetting;
                self.cruise_velocity = MotionMagicLimits::default().cruise_velocity;
            },
            ConfigParam::SensorPhase(inverted) => self.sensor_phase = inverted,
            ConfigParam::NeutralMode(mode) => self.neutral_mode = mode,
            ConfigParam::MotionCruiseVelocity(v) => self.cruise_velocity = v,
            ConfigParam::SensorPosition(p) => self.position = p as f64,
            _ => {},
        }
        self.params.push(param);
    }

    fn phase_sign(&self) -> f64 {
        if self.sensor_phase { -1.0 } else { 1.0 }
    }
}

/// 仿真设备的只读快照
#[derive(Debug, Clone, PartialEq)]
pub struct SimDeviceSnapshot {
    pub id: DeviceId,
    /// 按写入顺序记录的参数
    pub params: Vec<ConfigParam>,
    pub last_command: MotorCommand,
    /// `set()` 被调用的次数
    pub command_count: usize,
    /// 传感器位置（原生单位）
    pub position: f64,
    pub sensor_phase: bool,
    pub neutral_mode: NeutralMode,
    /// 最近一次 `step()` 计算出的实际输出
    pub applied_output: f32,
    pub fault: Option<String>,
}

#[derive(Debug)]
struct SimBusState {
    devices: BTreeMap<DeviceId, SimDevice>,
    outputs_enabled: bool,
    free_speed: f32,
}

/// 仿真设备总线
#[derive(Debug, Clone)]
pub struct SimBus {
    state: Arc<Mutex<SimBusState>>,
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBus {
    /// 创建空总线（输出默认使能）
    pub fn new() -> Self {
        Self::with_free_speed(FULL_OUTPUT_SENSOR_VELOCITY)
    }

    /// 指定空载速度（原生单位 / 100ms）
    pub fn with_free_speed(free_speed: f32) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimBusState {
                devices: BTreeMap::new(),
                outputs_enabled: true,
                free_speed,
            })),
        }
    }

    /// 获取设备句柄（不存在则创建）
    pub fn device(&self, id: DeviceId) -> SimMotorController {
        self.state.lock().devices.entry(id).or_default();
        SimMotorController {
            id,
            bus: self.clone(),
        }
    }

    /// 总线上的设备 ID
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.state.lock().devices.keys().copied().collect()
    }

    /// 使能或禁用所有输出
    pub fn set_outputs_enabled(&self, enabled: bool) {
        let mut state = self.state.lock();
        if state.outputs_enabled != enabled {
            if enabled {
                trace!("Sim outputs enabled");
            } else {
                warn!("Sim outputs disabled");
            }
        }
        state.outputs_enabled = enabled;
    }

    pub fn outputs_enabled(&self) -> bool {
        self.state.lock().outputs_enabled
    }

    /// 注入故障：之后对该设备的所有调用都返回 `DeviceError::Fault`
    pub fn inject_fault(&self, id: DeviceId, message: &str) {
        let mut state = self.state.lock();
        state.devices.entry(id).or_default().fault = Some(message.to_string());
    }

    /// 清除故障
    pub fn clear_fault(&self, id: DeviceId) {
        if let Some(device) = self.state.lock().devices.get_mut(&id) {
            device.fault = None;
        }
    }

    /// 设备快照
    pub fn snapshot(&self, id: DeviceId) -> Option<SimDeviceSnapshot> {
        let state = self.state.lock();
        state.devices.get(&id).map(|d| SimDeviceSnapshot {
            id,
            params: d.params.clone(),
            last_command: d.last_command,
            command_count: d.command_count,
            position: d.position,
            sensor_phase: d.sensor_phase,
            neutral_mode: d.neutral_mode,
            applied_output: d.applied_output,
            fault: d.fault.clone(),
        })
    }

    /// 解析跟随链后的有效命令
    ///
    /// 从电机返回其最终主电机的命令；成环或超出深度返回 `Neutral`。
    pub fn effective_command(&self, id: DeviceId) -> Option<MotorCommand> {
        let state = self.state.lock();
        Self::resolve(&state, id)
    }

    fn resolve(state: &SimBusState, id: DeviceId) -> Option<MotorCommand> {
        let mut current = id;
        for _ in 0..MAX_FOLLOW_DEPTH {
            let command = state.devices.get(&current)?.last_command;
            match command {
                MotorCommand::Follow(leader) => current = leader,
                other => return Some(other),
            }
        }
        Some(MotorCommand::Neutral)
    }

    /// 推进仿真时间
    pub fn step(&self, dt: Duration) {
        let mut state = self.state.lock();
        let dt_100ms = dt.as_secs_f64() * 10.0;
        let free_speed = state.free_speed as f64;
        let enabled = state.outputs_enabled;

        // 先计算非跟随设备的实际输出
        let ids: Vec<DeviceId> = state.devices.keys().copied().collect();
        let mut leader_outputs: BTreeMap<DeviceId, f32> = BTreeMap::new();
        for id in &ids {
            let Some(device) = state.devices.get_mut(id) else {
                continue;
            };
            if device.last_command.is_follow() {
                continue;
            }
            let output = if enabled {
                Self::step_device(device, dt_100ms, free_speed)
            } else {
                0.0
            };
            device.applied_output = output;
            leader_outputs.insert(*id, output);
        }

        // 再让从电机复制主电机的输出
        for id in &ids {
            let root = Self::follow_root(&state, *id);
            let Some(root) = root else {
                continue;
            };
            let output = leader_outputs.get(&root).copied().unwrap_or(0.0);
            if let Some(device) = state.devices.get_mut(id) {
                device.applied_output = output;
                device.position += output as f64 * free_speed * dt_100ms * device.phase_sign();
            }
        }
    }

    /// 跟随链的根（非跟随设备返回 `None`）
    fn follow_root(state: &SimBusState, id: DeviceId) -> Option<DeviceId> {
        let mut current = id;
        let mut followed = false;
        for _ in 0..MAX_FOLLOW_DEPTH {
            match state.devices.get(&current)?.last_command {
                MotorCommand::Follow(leader) => {
                    current = leader;
                    followed = true;
                },
                _ => return followed.then_some(current),
            }
        }
        None
    }

    fn step_device(device: &mut SimDevice, dt_100ms: f64, free_speed: f64) -> f32 {
        match device.last_command {
            MotorCommand::PercentOutput(output) => {
                let output = output.clamp(-1.0, 1.0);
                device.position += output as f64 * free_speed * dt_100ms * device.phase_sign();
                output
            },
            MotorCommand::MotionMagic(target) => {
                if dt_100ms <= 0.0 {
                    return 0.0;
                }
                let error = target as f64 - device.position;
                let max_step = device.cruise_velocity as f64 * dt_100ms;
                let step = error.clamp(-max_step, max_step);
                device.position += step;
                ((step / dt_100ms) / free_speed).clamp(-1.0, 1.0) as f32
                    * device.phase_sign() as f32
            },
            MotorCommand::Follow(_) | MotorCommand::Neutral => 0.0,
        }
    }

    fn with_device<T>(
        &self,
        id: DeviceId,
        f: impl FnOnce(&mut SimDevice) -> T,
    ) -> Result<T, DeviceError> {
        let mut state = self.state.lock();
        let device = state.devices.get_mut(&id).ok_or(DeviceError::NotFound(id))?;
        if let Some(message) = &device.fault {
            return Err(DeviceError::Fault {
                id,
                message: message.clone(),
            });
        }
        Ok(f(device))
    }

    fn contains(&self, id: DeviceId) -> bool {
        self.state.lock().devices.contains_key(&id)
    }
}

/// 仿真电机控制器句柄
#[derive(Debug, Clone)]
pub struct SimMotorController {
    id: DeviceId,
    bus: SimBus,
}

impl SimMotorController {
    /// 所属总线
    pub fn bus(&self) -> &SimBus {
        &self.bus
    }
}

impl MotorController for SimMotorController {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn write_param(&mut self, param: ConfigParam, _timeout: Duration) -> Result<(), DeviceError> {
        trace!("Sim {} <- {:?}", self.id, param);
        self.bus.with_device(self.id, |d| d.apply_param(param))
    }

    fn set(&mut self, command: MotorCommand) -> Result<(), DeviceError> {
        if let MotorCommand::Follow(leader) = command {
            if leader == self.id {
                return Err(DeviceError::Rejected {
                    id: self.id,
                    reason: "device cannot follow itself".to_string(),
                });
            }
            if !self.bus.contains(leader) {
                return Err(DeviceError::NotFound(leader));
            }
        }
        self.bus.with_device(self.id, |d| {
            d.last_command = command;
            d.command_count += 1;
        })
    }

    fn selected_sensor_position(&mut self) -> Result<i32, DeviceError> {
        self.bus.with_device(self.id, |d| d.position.round() as i32)
    }
}

/// 仿真平台看门狗
///
/// 把软件看门狗的状态同步到仿真总线：超时后总线禁用所有输出。
#[derive(Debug, Clone)]
pub struct SimWatchdog {
    inner: SoftwareWatchdog,
    bus: SimBus,
}

impl SimWatchdog {
    pub fn new(bus: SimBus, timeout: Duration) -> Self {
        // 喂狗之前平台不使能输出
        bus.set_outputs_enabled(false);
        Self {
            inner: SoftwareWatchdog::new(timeout),
            bus,
        }
    }
}

impl Watchdog for SimWatchdog {
    fn feed(&mut self, now: Duration) {
        self.inner.feed(now);
        self.bus.set_outputs_enabled(true);
    }

    fn outputs_enabled(&mut self, now: Duration) -> bool {
        let alive = self.inner.is_alive(now);
        self.bus.set_outputs_enabled(alive);
        alive
    }
}
