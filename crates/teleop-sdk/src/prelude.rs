//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use teleop_sdk::prelude::*;
//! ```

// 控制层
pub use teleop_control::{
    Clock, ControlContext, LoopConfig, LoopSummary, ManualClock, MixerConfig, OutputMixer,
    StopFlag, SystemClock, Teleop, TeleopError, TeleopOptions, TickReport, run_loop,
};

// 设备层
pub use teleop_device::{
    DeviceError, Drivetrain, DrivetrainConfig, DrivetrainDevices, LeaderPositions,
    MotorController, SimBus, SimMotorController, SimWatchdog, SoftwareWatchdog, Watchdog,
};

// 输入层
pub use teleop_input::{
    Gamepad, GamepadFrame, GamepadMapping, InputError, InputSample, InputSampler, InputScript,
    ScriptStep, ScriptedGamepad, deadband,
};

// 协议层
pub use teleop_protocol::{
    ConfigParam, ControlMode, DeviceId, DeviceIds, DriveOutputs, MotorCommand, MotorConfig,
    ProtocolError,
};

// 工具层
pub use teleop_tools::{ConfigError, TeleopConfig, TelemetryFrame, TelemetryRecording};
