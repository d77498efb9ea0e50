//! # Teleop CLI
//!
//! 在仿真总线上运行遥操作循环、管理配置文件、查看遥测录制。
//!
//! ```bash
//! # 生成默认配置
//! teleop-cli config init
//!
//! # 回放输入脚本（手动时钟，不真实等待）
//! teleop-cli run --script drive.json --record run.teleop
//!
//! # 按真实时间运行（Ctrl+C 停止）
//! teleop-cli run --script drive.json --realtime
//!
//! # 查看录制
//! teleop-cli inspect run.teleop
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigCommand, InspectCommand, RunCommand};

/// Teleop CLI - 底盘遥操作命令行工具
#[derive(Parser, Debug)]
#[command(name = "teleop-cli")]
#[command(about = "Run and inspect gamepad teleoperation of a tank drivetrain", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行遥操作循环
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 查看遥测录制
    Inspect {
        #[command(flatten)]
        args: InspectCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，stdout 留给命令结果）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("teleop_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
        Commands::Inspect { args } => args.execute(),
    }
}
