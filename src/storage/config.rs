use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::format::{DateFormats, FormatterMode};
use crate::calendar::period::WeekStart;
use crate::error::EngineError;

pub const DAY_PADDING: f64 = 12.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub formatting: FormattingConfig,
    pub day_view: DayViewConfig,
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
    pub week_starts_on: WeekStart,
    pub display_all_month_events: bool,
    pub excluded_days: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormattingConfig {
    pub date_formatter: FormatterMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_formats: Option<DateFormats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DayViewConfig {
    #[serde(with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end: NaiveTime,
    pub split: u32,
    pub segment_size: f64,
    pub event_width: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TemplatesConfig {
    pub locations: BTreeMap<String, String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_starts_on: WeekStart::default(),
            display_all_month_events: true,
            excluded_days: Vec::new(),
        }
    }
}

impl Default for DayViewConfig {
    fn default() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
            split: 30,
            segment_size: 30.0,
            event_width: 150.0,
        }
    }
}

impl DayViewConfig {
    pub fn max_event_width(&self) -> f64 {
        self.event_width - DAY_PADDING
    }

    pub fn minutes_to_pixels(&self, minutes: f64) -> f64 {
        minutes * self.segment_size / self.split as f64
    }

    pub fn hour_height(&self) -> f64 {
        (60.0 / self.split as f64) * self.segment_size
    }
}

impl FormattingConfig {
    pub fn date_formats(&self) -> DateFormats {
        self.date_formats
            .clone()
            .unwrap_or_else(|| DateFormats::for_mode(self.date_formatter))
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calgrid")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for day in &self.calendar.excluded_days {
            crate::calendar::period::weekday_from_number(*day)?;
        }
        if self.day_view.split == 0 || 60 % self.day_view.split != 0 {
            return Err(EngineError::Configuration(format!(
                "day_view.split must divide an hour evenly, got {}",
                self.day_view.split
            )));
        }
        if self.day_view.event_width <= DAY_PADDING {
            return Err(EngineError::Configuration(format!(
                "day_view.event_width must be wider than the {} pixel padding",
                DAY_PADDING
            )));
        }
        if self.day_view.end <= self.day_view.start {
            return Err(EngineError::Configuration(format!(
                "day_view.end ({}) must be after day_view.start ({})",
                self.day_view.end.format("%H:%M"),
                self.day_view.start.format("%H:%M")
            )));
        }
        Ok(())
    }

    pub fn is_excluded(&self, weekday: chrono::Weekday) -> bool {
        let number = weekday.num_days_from_sunday() as u8;
        self.calendar.excluded_days.contains(&number)
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .map_err(|_| serde::de::Error::custom(format!("invalid HH:mm time '{}'", raw)))
    }
}
