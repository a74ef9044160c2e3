use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Lower bound of a category default in the Config tab
pub const MIN_DEFAULT_SECS: u64 = 1;
/// Upper bound of a category default in the Config tab
pub const MAX_DEFAULT_SECS: u64 = 3600;
pub const MIN_BAR_HEIGHT: u16 = 1;
pub const MAX_BAR_HEIGHT: u16 = 6;
/// Floor for the tick, blink and alarm intervals
pub const MIN_INTERVAL_MS: u64 = 10;

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timers: TimerConfig,
    /// Default duration in seconds per category name
    #[serde(default = "default_durations")]
    pub defaults: IndexMap<String, u64>,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            timers: TimerConfig::default(),
            defaults: default_durations(),
            alarm: AlarmConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default duration for a category, falling back to the built-in value
    /// when the config file does not mention it.
    pub fn default_secs(&self, category: Category) -> u64 {
        self.defaults
            .get(category.name())
            .copied()
            .unwrap_or_else(|| category.default_secs())
    }

    /// Overwrite a category default, clamped to the Config tab range.
    pub fn set_default_secs(&mut self, category: Category, secs: u64) -> u64 {
        let secs = secs.clamp(MIN_DEFAULT_SECS, MAX_DEFAULT_SECS);
        self.defaults.insert(category.name().to_string(), secs);
        secs
    }

    pub fn set_bar_height(&mut self, rows: u16) -> u16 {
        self.ui.bar_height = rows.clamp(MIN_BAR_HEIGHT, MAX_BAR_HEIGHT);
        self.ui.bar_height
    }

    /// Bring values read from a file into the ranges the runtime setters
    /// allow, and list every category in `defaults` (built-in value when
    /// the file leaves one out). Unknown keys are kept after the categories.
    pub fn normalize(&mut self) {
        let mut defaults = IndexMap::new();
        for category in Category::ALL {
            let secs = self
                .default_secs(category)
                .clamp(MIN_DEFAULT_SECS, MAX_DEFAULT_SECS);
            defaults.insert(category.name().to_string(), secs);
        }
        for (name, secs) in &self.defaults {
            if !defaults.contains_key(name) {
                defaults.insert(name.clone(), *secs);
            }
        }
        self.defaults = defaults;
        self.set_bar_height(self.ui.bar_height);

        let timers = &mut self.timers;
        timers.tick_ms = timers.tick_ms.max(MIN_INTERVAL_MS);
        timers.blink_ms = timers.blink_ms.max(MIN_INTERVAL_MS);
        timers.alarm_ms = timers.alarm_ms.max(MIN_INTERVAL_MS);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Redraw interval of a running timer
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Color flip interval of an expired timer
    #[serde(default = "default_blink_ms")]
    pub blink_ms: u64,
    /// Interval between alarm sounds
    #[serde(default = "default_alarm_ms")]
    pub alarm_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            max_concurrent: default_max_concurrent(),
            tick_ms: default_tick_ms(),
            blink_ms: default_blink_ms(),
            alarm_ms: default_alarm_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Ring the terminal bell on every alarm iteration
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Sound file handed to the external player. Missing file = bell only.
    #[serde(default = "default_sound_file")]
    pub sound_file: Option<String>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        AlarmConfig {
            bell: true,
            sound_file: default_sound_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per timer bar (the terminal's equivalent of a font size)
    #[serde(default = "default_bar_height")]
    pub bar_height: u16,
    /// Category color overrides, e.g. `red = "#ff0000"`
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            bar_height: default_bar_height(),
            colors: IndexMap::new(),
        }
    }
}

fn default_durations() -> IndexMap<String, u64> {
    Category::ALL
        .into_iter()
        .map(|c| (c.name().to_string(), c.default_secs()))
        .collect()
}

fn default_max_concurrent() -> usize {
    10
}

fn default_tick_ms() -> u64 {
    100
}

fn default_blink_ms() -> u64 {
    100
}

fn default_alarm_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_sound_file() -> Option<String> {
    Some("alarm.wav".to_string())
}

fn default_bar_height() -> u16 {
    3
}
