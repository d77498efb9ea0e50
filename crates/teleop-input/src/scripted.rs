//! 脚本手柄
//!
//! 按 JSON 脚本回放手柄输入，用于离线运行和测试。脚本由若干步组成，
//! 每步持续若干次轮询。脚本结束后手柄视为断开（全部归中）。
//!
//! ```json
//! {
//!   "steps": [
//!     { "ticks": 200, "axes": [0.0, -0.5, 0.0, 0.0, 0.0, 0.0], "buttons": [5] },
//!     { "ticks": 100, "buttons": [7, 6] },
//!     { "ticks": 50, "connected": false }
//!   ]
//! }
//! ```

use crate::{AXIS_COUNT, BUTTON_COUNT, ConnectionStatus, Gamepad, GamepadFrame, InputError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

fn default_connected() -> bool {
    true
}

/// 脚本中的一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// 本步持续的轮询次数
    pub ticks: u32,
    /// 原始轴值
    #[serde(default)]
    pub axes: [f32; AXIS_COUNT],
    /// 按下的按键（从 1 开始编号）
    #[serde(default)]
    pub buttons: Vec<u8>,
    #[serde(default = "default_connected")]
    pub connected: bool,
}

impl ScriptStep {
    /// 已连接、全部归中
    pub fn neutral(ticks: u32) -> Self {
        Self {
            ticks,
            axes: [0.0; AXIS_COUNT],
            buttons: Vec::new(),
            connected: true,
        }
    }

    pub fn with_axis(mut self, index: usize, value: f32) -> Self {
        if let Some(axis) = self.axes.get_mut(index) {
            *axis = value;
        }
        self
    }

    pub fn with_buttons(mut self, buttons: &[u8]) -> Self {
        self.buttons = buttons.to_vec();
        self
    }

    pub fn disconnected(ticks: u32) -> Self {
        Self {
            connected: false,
            ..Self::neutral(ticks)
        }
    }

    /// 转换为手柄帧
    pub fn frame(&self) -> GamepadFrame {
        if !self.connected {
            return GamepadFrame::default();
        }
        self.buttons.iter().fold(
            GamepadFrame {
                axes: self.axes,
                buttons: 0,
                status: ConnectionStatus::Connected,
            },
            |frame, &button| frame.with_button(button as usize),
        )
    }

    fn validate(&self) -> Result<(), InputError> {
        if let Some(&button) = self
            .buttons
            .iter()
            .find(|&&b| !(1..=BUTTON_COUNT).contains(&(b as usize)))
        {
            return Err(InputError::ButtonOutOfRange {
                index: button as usize,
                count: BUTTON_COUNT,
            });
        }
        Ok(())
    }
}

/// 输入脚本
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let script: Self = serde_json::from_str(json)?;
        for step in &script.steps {
            step.validate()?;
        }
        Ok(script)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let script = Self::from_json(&json)?;
        debug!(
            "Loaded input script from {:?}: {} steps, {} ticks",
            path,
            script.steps.len(),
            script.total_ticks()
        );
        Ok(script)
    }

    /// 脚本覆盖的总轮询次数
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }
}

/// 回放 [`InputScript`] 的手柄
#[derive(Debug, Clone)]
pub struct ScriptedGamepad {
    script: InputScript,
    step: usize,
    tick_in_step: u32,
    polls: u64,
}

impl ScriptedGamepad {
    pub fn new(script: InputScript) -> Self {
        Self {
            script,
            step: 0,
            tick_in_step: 0,
            polls: 0,
        }
    }

    /// 脚本是否已回放完毕
    pub fn is_finished(&self) -> bool {
        self.skip_empty_steps() >= self.script.steps.len()
    }

    /// 已轮询次数
    pub fn polls(&self) -> u64 {
        self.polls
    }

    fn skip_empty_steps(&self) -> usize {
        let mut step = self.step;
        while self.script.steps.get(step).is_some_and(|s| s.ticks == 0) {
            step += 1;
        }
        step
    }
}

impl Gamepad for ScriptedGamepad {
    fn poll(&mut self) -> Result<GamepadFrame, InputError> {
        self.polls += 1;
        self.step = self.skip_empty_steps();

        let Some(step) = self.script.steps.get(self.step) else {
            return Ok(GamepadFrame::default());
        };
        let frame = step.frame();

        self.tick_in_step += 1;
        if self.tick_in_step >= step.ticks {
            self.step += 1;
            self.tick_in_step = 0;
        }
        Ok(frame)
    }
}
