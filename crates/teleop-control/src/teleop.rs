//! 遥操作周期流水线
//!
//! [`Teleop`] 独占驱动系统、手柄、看门狗和控制上下文，每次 [`Teleop::tick`]
//! 执行一个完整周期：
//!
//! 1. 采样手柄（死区过滤）
//! 2. 手柄在线时喂狗
//! 3. 根据按键更新模式
//! 4. 计算驱动输出并下发给主电机（和进料电机）
//! 5. 直接输出模式下读取编码器位置（诊断）
//!
//! 任何设备或输入错误都会立即返回，不发送后续命令。

use std::time::Duration;
use teleop_device::{DeviceError, Drivetrain, MotorController, Watchdog};
use teleop_input::{Gamepad, GamepadMapping, InputSampler};
use tracing::debug;

use crate::{ControlContext, MixerConfig, OutputMixer, SafetyFeed, TeleopError, TickReport};

/// 周期流水线选项
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TeleopOptions {
    pub mixer: MixerConfig,
    /// 直接输出模式下每周期读取并报告主电机编码器位置
    pub report_positions: bool,
}

impl Default for TeleopOptions {
    fn default() -> Self {
        Self {
            mixer: MixerConfig::default(),
            report_positions: true,
        }
    }
}

/// 遥操作流水线
pub struct Teleop<M: MotorController, G: Gamepad, W: Watchdog> {
    drivetrain: Drivetrain<M>,
    gamepad: G,
    watchdog: W,
    sampler: InputSampler,
    mixer: OutputMixer,
    safety: SafetyFeed,
    context: ControlContext,
    report_positions: bool,
}

impl<M: MotorController, G: Gamepad, W: Watchdog> Teleop<M, G, W> {
    /// 创建流水线
    ///
    /// 驱动系统必须已经完成启动配置。
    pub fn new(
        drivetrain: Drivetrain<M>,
        gamepad: G,
        watchdog: W,
        mapping: GamepadMapping,
        options: TeleopOptions,
    ) -> Result<Self, TeleopError> {
        if !drivetrain.is_configured() {
            return Err(TeleopError::Device(DeviceError::NotConfigured));
        }
        options
            .mixer
            .validate()
            .map_err(|e| TeleopError::Config(e.to_string()))?;

        Ok(Self {
            drivetrain,
            gamepad,
            watchdog,
            sampler: InputSampler::new(mapping)?,
            mixer: OutputMixer::new(options.mixer),
            safety: SafetyFeed::new(),
            context: ControlContext::new(),
            report_positions: options.report_positions,
        })
    }

    /// 执行一个周期
    pub fn tick(&mut self, now: Duration) -> Result<TickReport, TeleopError> {
        let sample = self.sampler.sample(&mut self.gamepad)?;

        let fed = self.safety.service(&mut self.watchdog, sample.connected, now);
        let mode_changed = self.context.update_mode(&sample.buttons);
        let mode = self.context.mode;

        let outputs = self.mixer.mix(&sample.axes, &sample.buttons, mode);
        self.drivetrain.apply(&outputs)?;

        let positions = if mode.is_direct() && self.report_positions {
            let positions = self.drivetrain.positions()?;
            debug!(
                "Left encoder: {}, right encoder: {}",
                positions.left, positions.right
            );
            Some(positions)
        } else {
            None
        };

        let outputs_enabled = self.watchdog.outputs_enabled(now);

        let report = TickReport {
            tick: self.context.tick,
            timestamp: now,
            mode,
            mode_changed,
            sample,
            outputs,
            positions,
            fed,
            outputs_enabled,
        };
        self.context.tick += 1;
        Ok(report)
    }

    pub fn context(&self) -> &ControlContext {
        &self.context
    }

    pub fn drivetrain(&self) -> &Drivetrain<M> {
        &self.drivetrain
    }

    pub fn gamepad(&self) -> &G {
        &self.gamepad
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    /// 累计喂狗次数
    pub fn feeds(&self) -> u64 {
        self.safety.feeds()
    }

    /// 拆分出驱动系统、手柄和看门狗
    pub fn into_parts(self) -> (Drivetrain<M>, G, W) {
        (self.drivetrain, self.gamepad, self.watchdog)
    }
}
