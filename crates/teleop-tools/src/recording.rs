//! # 遥测录制格式
//!
//! 每个控制周期一帧，记录模式、命令、编码器位置与安全状态。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;
use teleop_control::TickReport;
use teleop_protocol::ControlMode;

/// 录制文件魔数（最后一字节为格式主版本）
pub const MAGIC: &[u8; 8] = b"TELEOP\0\x01";

/// 当前格式版本
pub const FORMAT_VERSION: u8 = 1;

/// 遥测录制
///
/// 文件格式：
///
/// ```text
/// [MAGIC: 8 bytes]
/// [Version: 1 byte]
/// [Data: bincode serialized TelemetryRecording]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecording {
    pub version: u8,
    pub metadata: RecordingMetadata,
    pub frames: Vec<TelemetryFrame>,
}

impl TelemetryRecording {
    pub fn new(metadata: RecordingMetadata) -> Self {
        Self {
            version: FORMAT_VERSION,
            metadata,
            frames: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, frame: TelemetryFrame) {
        self.frames.push(frame);
    }

    /// 记录一个周期报告
    pub fn record(&mut self, report: &TickReport) {
        self.add_frame(TelemetryFrame::from(report));
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// 首帧到末帧的时间跨度
    pub fn duration(&self) -> Option<Duration> {
        let first = self.frames.first()?.timestamp_us;
        let last = self.frames.last()?.timestamp_us;
        Some(Duration::from_micros(last.saturating_sub(first)))
    }

    /// 按控制模式过滤
    pub fn filter_by_mode(&self, mode: ControlMode) -> TelemetryRecording {
        let mut filtered = TelemetryRecording::new(self.metadata.clone());
        filtered.frames = self.frames.iter().filter(|f| f.mode == mode).cloned().collect();
        filtered
    }

    /// 各模式的帧数 `(direct, servo)`
    pub fn mode_counts(&self) -> (usize, usize) {
        let direct = self.frames.iter().filter(|f| f.mode.is_direct()).count();
        (direct, self.frames.len() - direct)
    }

    /// 保存到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create recording file {:?}", path))?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC).context("Failed to write magic")?;
        writer.write_all(&[self.version]).context("Failed to write version")?;

        let data = bincode::serialize(self).context("Failed to serialize recording")?;
        writer.write_all(&data).context("Failed to write recording data")?;
        writer.flush().context("Failed to flush recording file")?;

        Ok(())
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open recording file {:?}", path))?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).context("Failed to read magic")?;
        if &magic != MAGIC {
            anyhow::bail!("Not a teleop recording (magic mismatch)");
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version).context("Failed to read version")?;
        if version[0] != FORMAT_VERSION {
            anyhow::bail!("Unsupported recording version: {}", version[0]);
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).context("Failed to read recording data")?;
        let recording: TelemetryRecording =
            bincode::deserialize(&data).context("Failed to deserialize recording")?;

        Ok(recording)
    }
}

/// 录制元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// 录制开始时间（Unix 时间戳，秒）
    pub start_time: u64,
    /// 控制周期（微秒）
    pub period_us: u64,
    /// 输入来源（脚本路径或设备名）
    pub source: String,
    /// 平台信息
    pub platform: String,
    pub notes: String,
}

impl RecordingMetadata {
    pub fn new(source: String, period: Duration) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        Self {
            start_time: SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs(),
            period_us: period.as_micros() as u64,
            source,
            platform: std::env::consts::OS.to_string(),
            notes: String::new(),
        }
    }
}

/// 单周期遥测帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// 时间戳（微秒，自循环时钟起点）
    pub timestamp_us: u64,
    pub tick: u64,
    pub mode: ControlMode,
    /// 左侧命令（百分比或原生单位目标）
    pub left: f32,
    pub right: f32,
    /// 进料命令（本周期未下发时为 `None`）
    pub intake: Option<f32>,
    /// 辅助旋转轴目标（仅伺服模式）
    pub secondary_target: Option<f32>,
    pub left_position: Option<i32>,
    pub right_position: Option<i32>,
    pub connected: bool,
    pub fed: bool,
    pub outputs_enabled: bool,
}

impl From<&TickReport> for TelemetryFrame {
    fn from(report: &TickReport) -> Self {
        Self {
            timestamp_us: report.timestamp.as_micros() as u64,
            tick: report.tick,
            mode: report.mode,
            left: report.left_value(),
            right: report.right_value(),
            intake: report.intake_value(),
            secondary_target: report.outputs.secondary_target,
            left_position: report.positions.map(|p| p.left),
            right_position: report.positions.map(|p| p.right),
            connected: report.sample.connected,
            fed: report.fed,
            outputs_enabled: report.outputs_enabled,
        }
    }
}
