//! inspect 命令
//!
//! 打印遥测录制的概要

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use teleop_sdk::TelemetryRecording;

/// 查看命令参数
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// 录制文件路径
    pub recording: PathBuf,
}

impl InspectCommand {
    pub fn execute(&self) -> Result<()> {
        let recording = TelemetryRecording::load(&self.recording)?;
        let meta = &recording.metadata;
        let (direct, servo) = recording.mode_counts();
        let fed = recording.frames.iter().filter(|f| f.fed).count();
        let disabled = recording.frames.iter().filter(|f| !f.outputs_enabled).count();

        println!("📼 Recording: {}", self.recording.display());
        println!("  Version: {}", recording.version);
        println!("  Source: {}", meta.source);
        println!("  Platform: {}", meta.platform);
        println!("  Period: {} us", meta.period_us);
        println!("  Frames: {}", recording.frame_count());
        match recording.duration() {
            Some(duration) => println!("  Duration: {:.3} s", duration.as_secs_f64()),
            None => println!("  Duration: -"),
        }
        println!("  Direct output frames: {}", direct);
        println!("  Positional servo frames: {}", servo);
        println!("  Watchdog fed: {}", fed);
        println!("  Outputs disabled: {}", disabled);

        Ok(())
    }
}
