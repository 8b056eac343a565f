use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cleaner::DEFAULT_SETTLE_DELAY;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nvidia_smi: NvidiaSmiConfig,
    pub clear: ClearConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NvidiaSmiConfig {
    pub binary: PathBuf,
    pub timeout_ms: u64,
}

impl Default for NvidiaSmiConfig {
    fn default() -> Self {
        NvidiaSmiConfig {
            binary: PathBuf::from("nvidia-smi"),
            timeout_ms: 10_000,
        }
    }
}

impl NvidiaSmiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClearConfig {
    pub settle_delay_ms: u64,
}

impl Default for ClearConfig {
    fn default() -> Self {
        ClearConfig {
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
        }
    }
}

impl ClearConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gpu-clean").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
