use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::{PolicyKind, ProgressModel};
use crate::session::{DrillSettings, EducationSettings};

pub const LOCALES: [&str; 2] = ["en", "uk"];

/// Fields editable from the settings screen, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Setting {
    Theme,
    Locale,
    SelectionPolicy,
    LearnedThreshold,
    DrillTimeBudget,
    TrackSetStats,
}

impl Setting {
    pub const ALL: [Setting; 6] = [
        Setting::Theme,
        Setting::Locale,
        Setting::SelectionPolicy,
        Setting::LearnedThreshold,
        Setting::DrillTimeBudget,
        Setting::TrackSetStats,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_learned_threshold")]
    pub learned_threshold: u32,
    #[serde(default)]
    pub selection_policy: PolicyKind,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_block_exposures")]
    pub block_exposures: u32,
    #[serde(default = "default_review_interval")]
    pub review_interval: u32,
    #[serde(default = "default_low_supply_threshold")]
    pub low_supply_threshold: usize,
    #[serde(default = "default_drill_time_budget_secs")]
    pub drill_time_budget_secs: u64,
    #[serde(default = "default_accuracy_pool_size")]
    pub accuracy_pool_size: usize,
    #[serde(default = "default_track_set_stats")]
    pub track_set_stats: bool,
    /// Signed-in user; `None` plays as a guest.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_learned_threshold() -> u32 {
    crate::engine::LEARNED_THRESHOLD
}
fn default_history_window() -> usize {
    3
}
fn default_block_exposures() -> u32 {
    5
}
fn default_review_interval() -> u32 {
    10
}
fn default_low_supply_threshold() -> usize {
    3
}
fn default_drill_time_budget_secs() -> u64 {
    240
}
fn default_accuracy_pool_size() -> usize {
    20
}
fn default_track_set_stats() -> bool {
    true
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexdrill")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learned_threshold: default_learned_threshold(),
            selection_policy: PolicyKind::default(),
            history_window: default_history_window(),
            block_exposures: default_block_exposures(),
            review_interval: default_review_interval(),
            low_supply_threshold: default_low_supply_threshold(),
            drill_time_budget_secs: default_drill_time_budget_secs(),
            accuracy_pool_size: default_accuracy_pool_size(),
            track_set_stats: default_track_set_stats(),
            user_id: None,
            theme: default_theme(),
            locale: default_locale(),
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lexdrill")
            .join("config.toml")
    }

    /// Clamp numeric settings into usable ranges and reset unknown keys.
    pub fn validate(&mut self) {
        self.learned_threshold = self.learned_threshold.clamp(1, 100);
        self.history_window = self.history_window.min(10);
        self.block_exposures = self.block_exposures.clamp(1, 20);
        self.review_interval = self.review_interval.clamp(2, 100);
        self.low_supply_threshold = self.low_supply_threshold.min(10);
        self.drill_time_budget_secs = self.drill_time_budget_secs.clamp(30, 3600);
        self.accuracy_pool_size = self.accuracy_pool_size.clamp(1, 200);
        if !LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if self.user_id.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.user_id = None;
        }
    }

    /// Copy one settings-screen field from `other`.
    pub fn copy_setting(&mut self, other: &Config, setting: Setting) {
        match setting {
            Setting::Theme => self.theme = other.theme.clone(),
            Setting::Locale => self.locale = other.locale.clone(),
            Setting::SelectionPolicy => self.selection_policy = other.selection_policy,
            Setting::LearnedThreshold => self.learned_threshold = other.learned_threshold,
            Setting::DrillTimeBudget => {
                self.drill_time_budget_secs = other.drill_time_budget_secs
            }
            Setting::TrackSetStats => self.track_set_stats = other.track_set_stats,
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn education_settings(&self) -> EducationSettings {
        EducationSettings {
            model: ProgressModel::new(self.learned_threshold),
            history_window: self.history_window,
            block_exposures: self.block_exposures,
            review_interval: self.review_interval,
            low_supply_threshold: self.low_supply_threshold,
            track_set_stats: self.track_set_stats,
        }
    }

    pub fn drill_settings(&self) -> DrillSettings {
        DrillSettings {
            time_budget: Duration::from_secs(self.drill_time_budget_secs),
            accuracy_pool_size: self.accuracy_pool_size,
        }
    }
}

/// The config file as loaded, before command-line overrides.
///
/// Only fields changed from the settings screen are copied in, so one-off
/// flags such as `--guest` or `--theme` never reach the file.
#[derive(Clone, Debug)]
pub struct SavedConfig {
    path: PathBuf,
    config: Config,
    dirty: bool,
}

impl SavedConfig {
    pub fn new(path: PathBuf, config: Config) -> Self {
        Self {
            path,
            config,
            dirty: false,
        }
    }

    pub fn record(&mut self, effective: &Config, setting: Setting) {
        self.config.copy_setting(effective, setting);
        self.dirty = true;
    }

    /// Writes the file if any setting was recorded since the last save.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.config.validate();
        self.config.save_to(&self.path)?;
        self.dirty = false;
        Ok(())
    }
}
