pub mod range_types;

use crate::errors::{WalkerError, WalkerResult};
use range_types::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WalkerConfig {
    /// Directory holding one collision file per world region
    pub collision_dir: PathBuf,
    /// Extra obstacles merged on top of the builtin catalog
    pub obstacle_catalog: Option<PathBuf>,
    pub search: SearchSettings,
    pub walker: WalkerTuning,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    pub timeout: SearchBudget,
}

/// Radii, budgets and wait timings used by the path executor
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct WalkerTuning {
    pub locate_radius: TileRadius,
    pub interaction_range: TileRadius,
    pub lookahead: TileRadius,
    pub attempt_budget: AttemptBudget,
    pub max_replans: ReplanLimit,
    pub poll_interval: PollInterval,
    pub move_start_timeout: WaitTimeout,
    pub arrival_timeout: WaitTimeout,
    pub interaction_timeout: WaitTimeout,
    pub miss_backoff: WaitTimeout,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            collision_dir: default_collision_dir(),
            obstacle_catalog: None,
            search: SearchSettings::default(),
            walker: WalkerTuning::default(),
        }
    }
}

impl Default for WalkerTuning {
    fn default() -> Self {
        Self {
            locate_radius: TileRadius::new(10),
            interaction_range: TileRadius::new(3),
            lookahead: TileRadius::new(13),
            attempt_budget: AttemptBudget::new(5),
            max_replans: ReplanLimit::new(2),
            poll_interval: PollInterval::new(50),
            move_start_timeout: WaitTimeout::new(1200),
            arrival_timeout: WaitTimeout::new(6000),
            interaction_timeout: WaitTimeout::new(2500),
            miss_backoff: WaitTimeout::new(100),
        }
    }
}

impl WalkerTuning {
    /// Poll and timeout values handed to obstacle and teleport handlers
    pub fn timing(&self) -> Timing {
        Timing {
            poll: self.poll_interval.as_duration(),
            timeout: self.interaction_timeout.as_duration(),
        }
    }
}

/// Bounded-wait parameters for one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll: Duration,
    pub timeout: Duration,
}

impl Timing {
    pub fn new(poll: Duration, timeout: Duration) -> Self {
        Self { poll, timeout }
    }

    /// Same poll interval with the timeout scaled to `percent` of its value
    pub fn scaled(self, percent: u32) -> Self {
        Self {
            poll: self.poll,
            timeout: self.timeout * percent / 100,
        }
    }
}

fn default_collision_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("web-walker").join("collision"))
        .unwrap_or_else(|| PathBuf::from("collision"))
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("web-walker");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load the user config, falling back to defaults when it is absent or unreadable
pub fn load_config() -> WalkerConfig {
    let Some(config_path) = get_config_path() else {
        return WalkerConfig::default();
    };

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(WalkerError::Io(_)) => WalkerConfig::default(),
        Err(err) => {
            tracing::warn!("Ignoring config at {}: {err}", config_path.display());
            WalkerConfig::default()
        }
    }
}

/// Strict variant of [`load_config`] for an explicit file
pub fn load_config_from(path: &Path) -> WalkerResult<WalkerConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str::<WalkerConfig>(&contents)?)
}

pub fn save_config(config: &WalkerConfig) -> WalkerResult<()> {
    let config_path = get_config_path().ok_or(WalkerError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)
}

pub fn save_config_to(config: &WalkerConfig, path: &Path) -> WalkerResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
