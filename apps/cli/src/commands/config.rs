//! 配置管理命令
//!
//! 配置文件默认位于 `<config_dir>/teleop/config.toml`：
//! - Linux: `~/.config/teleop/config.toml`
//! - macOS: `~/Library/Application Support/teleop/config.toml`
//! - Windows: `%APPDATA%\teleop\config.toml`

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use teleop_sdk::TeleopConfig;
use tracing::info;

/// 默认配置文件路径
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;
    path.push("teleop");
    path.push("config.toml");
    Ok(path)
}

fn resolve(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

/// 加载配置
///
/// 显式指定的路径必须存在；默认路径不存在时使用默认配置。
pub fn load_config(path: Option<&Path>) -> Result<TeleopConfig> {
    match path {
        Some(path) => TeleopConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let path = default_config_path()?;
            TeleopConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        },
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入默认配置
    Init {
        /// 配置文件路径（默认使用平台配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },

    /// 打印配置（文件不存在时打印默认值）
    Show {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// 检查配置文件
    Check {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Init { path, force } => Self::init(resolve(path)?, force),
            ConfigCommand::Show { path } => Self::show(resolve(path)?),
            ConfigCommand::Check { path } => Self::check(resolve(path)?),
        }
    }

    fn init(path: PathBuf, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config file {} already exists (use --force to overwrite)",
                path.display()
            );
        }
        TeleopConfig::default()
            .save(&path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        info!("Wrote default config to {:?}", path);
        println!("✅ Wrote default config: {}", path.display());
        Ok(())
    }

    fn show(path: PathBuf) -> Result<()> {
        let config = TeleopConfig::load_or_default(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        if !path.exists() {
            println!("# {} not found, showing defaults", path.display());
        }
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn check(path: PathBuf) -> Result<()> {
        if !path.exists() {
            anyhow::bail!("Config file {} not found", path.display());
        }
        let config = TeleopConfig::load(&path)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        let ids = config.drivetrain.ids;
        println!("✅ Config OK: {}", path.display());
        println!(
            "  Devices: left {} / {}, right {} / {}, intake {}",
            ids.left_leader, ids.left_follower, ids.right_leader, ids.right_follower, ids.intake
        );
        println!(
            "  Loop: {} ms period, watchdog {} ms",
            config.control.period_ms, config.control.watchdog_timeout_ms
        );
        Ok(())
    }
}
