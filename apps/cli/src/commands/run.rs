//! run 命令
//!
//! 在仿真总线上回放输入脚本，运行完整的遥操作循环。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use teleop_sdk::prelude::*;
use teleop_sdk::tools::RecordingMetadata;
use tracing::info;

use super::config::load_config;

/// 运行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 输入脚本（JSON）
    #[arg(short, long)]
    pub script: PathBuf,

    /// 配置文件（默认使用平台配置目录，不存在时使用默认值）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 周期数（默认等于脚本长度）
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// 保存遥测录制
    #[arg(short, long)]
    pub record: Option<PathBuf>,

    /// 按真实时间运行（默认使用手动时钟，不等待）
    #[arg(long)]
    pub realtime: bool,
}

impl RunCommand {
    pub fn execute(&self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let script = InputScript::load(&self.script)
            .with_context(|| format!("Failed to load input script {}", self.script.display()))?;
        let ticks = self.ticks.unwrap_or_else(|| script.total_ticks());

        println!("📜 Script: {} ({} steps)", self.script.display(), script.steps.len());

        // 仿真平台
        let bus = SimBus::new();
        let ids = config.drivetrain.ids;
        let mut drivetrain = Drivetrain::new(DrivetrainDevices {
            left_leader: bus.device(ids.left_leader),
            left_follower: bus.device(ids.left_follower),
            right_leader: bus.device(ids.right_leader),
            right_follower: bus.device(ids.right_follower),
            intake: bus.device(ids.intake),
        });
        drivetrain
            .configure(&config.drivetrain)
            .context("Drivetrain startup configuration failed")?;

        let mut teleop = Teleop::new(
            drivetrain,
            ScriptedGamepad::new(script),
            SimWatchdog::new(bus.clone(), config.watchdog_timeout()),
            config.gamepad,
            config.teleop_options(),
        )?;

        let stop = StopFlag::new();
        let handler = stop.clone();
        ctrlc::set_handler(move || handler.stop()).context("Failed to install Ctrl+C handler")?;

        let loop_config = config.loop_config(Some(ticks));
        let period = loop_config.period;
        let mut recording = self.record.as_ref().map(|_| {
            TelemetryRecording::new(RecordingMetadata::new(
                self.script.display().to_string(),
                period,
            ))
        });

        let observer = |report: &TickReport| {
            bus.step(period);
            if let Some(recording) = recording.as_mut() {
                recording.record(report);
            }
        };

        info!("Running {} ticks (realtime: {})", ticks, self.realtime);
        let summary = if self.realtime {
            run_loop(&mut teleop, &SystemClock::new(), &loop_config, Some(&stop), observer)?
        } else {
            run_loop(&mut teleop, &ManualClock::new(), &loop_config, Some(&stop), observer)?
        };

        let left = bus.snapshot(ids.left_leader).map(|s| s.position).unwrap_or_default();
        let right = bus.snapshot(ids.right_leader).map(|s| s.position).unwrap_or_default();

        println!();
        println!("📊 Summary:");
        println!("  Ticks: {}", summary.ticks);
        println!("  Overruns: {}", summary.overruns);
        println!("  Watchdog feeds: {}", summary.feeds);
        println!("  Mode changes: {}", summary.mode_changes);
        println!("  Final mode: {}", summary.final_mode);
        println!("  Elapsed: {:.3} s", summary.elapsed.as_secs_f64());
        println!("  Encoders: left {:.0}, right {:.0}", left, right);
        if summary.stopped {
            println!("  Stopped by user");
        }

        if let (Some(path), Some(recording)) = (&self.record, recording) {
            recording
                .save(path)
                .with_context(|| format!("Failed to save recording {}", path.display()))?;
            println!("💾 Saved {} frames to {}", recording.frame_count(), path.display());
        }

        Ok(())
    }
}
