//! Parking occupancy prediction
//!
//! Encodes calendar, hour and weather selections into a fixed feature vector
//! and runs a per-facility regression model over it.

pub mod features;
pub mod model;
pub mod predict;
pub mod present;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::features::FeatureVector;

/// Holiday/workday classification of a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayType {
    Holiday,
    Workday,
}

impl DayType {
    /// Label used by the day-type category map
    pub fn label(&self) -> &'static str {
        match self {
            DayType::Holiday => "Festivo",
            DayType::Workday => "Laboral",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// User selections for a single prediction, as presented by a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub month: String,
    #[serde(deserialize_with = "day_label")]
    pub day: String,
    pub hour: String,
    pub facility: String,
    pub precipitation: String,
}

/// Accept the day as `"15"` or `15`
fn day_label<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DayLabel {
        Text(String),
        Number(i64),
    }

    Ok(match DayLabel::deserialize(deserializer)? {
        DayLabel::Text(s) => s,
        DayLabel::Number(n) => n.to_string(),
    })
}

/// Everything produced by one prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub selection: Selection,
    pub day_type: DayType,
    pub features: FeatureVector,
    /// Raw model output before rounding
    pub raw: f32,
    /// Predicted number of vehicles
    pub count: i64,
    pub model_path: PathBuf,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ParkingError {
    #[error("Unknown {map} label: {label:?}")]
    UnknownLabel { map: &'static str, label: String },

    #[error("Invalid day of month: {0:?}")]
    InvalidDay(String),

    #[error("Model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ParkingError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelsConfig,
    pub prediction: PredictionConfig,
    pub calendar: CalendarConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding one trained model per facility
    pub directory: String,
    /// File name template; `{facility}` is replaced by the lowercased facility label
    pub template: String,
    pub mlp: MlpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpConfig {
    pub hidden_dims: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Report negative model outputs as zero vehicles
    pub clamp_negative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub year: i32,
    /// Fixed-date holidays as "MM-DD"; weekends are added automatically.
    /// When absent the built-in table for `year` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            models: ModelsConfig {
                directory: "modelos_aparcamientos_entrenados".to_string(),
                template: "xgb_trained_model_{facility}.json".to_string(),
                mlp: MlpConfig {
                    hidden_dims: vec![64, 32],
                },
            },
            prediction: PredictionConfig {
                clamp_negative: true,
            },
            calendar: CalendarConfig {
                year: 2023,
                holidays: None,
            },
            server: ServerConfig {
                bind: "0.0.0.0:3000".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParkingError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ParkingError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ParkingError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_day_as_text_or_number() {
        let text: Selection = serde_json::from_str(
            r#"{"month":"Enero","day":"7","hour":"08:00","facility":"MATA","precipitation":"lluvioso"}"#,
        )
        .unwrap();
        let number: Selection = serde_json::from_str(
            r#"{"month":"Enero","day":7,"hour":"08:00","facility":"MATA","precipitation":"lluvioso"}"#,
        )
        .unwrap();
        assert_eq!(text, number);
        assert_eq!(number.day, "7");
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.models.template, "xgb_trained_model_{facility}.json");
        assert_eq!(parsed.models.mlp.hidden_dims, vec![64, 32]);
        assert!(parsed.prediction.clamp_negative);
        assert_eq!(parsed.calendar.year, 2023);
        assert!(parsed.calendar.holidays.is_none());
    }

    #[test]
    fn test_config_with_custom_holidays() {
        let text = r#"
            [models]
            directory = "models"
            template = "rf_trained_model_{facility}.mpk"
            [models.mlp]
            hidden_dims = [16]
            [prediction]
            clamp_negative = false
            [calendar]
            year = 2024
            holidays = ["01-01", "01-06"]
            [server]
            bind = "127.0.0.1:8080"
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.calendar.year, 2024);
        assert_eq!(
            config.calendar.holidays,
            Some(vec!["01-01".to_string(), "01-06".to_string()])
        );
        assert!(!config.prediction.clamp_negative);
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let config = Config::load_or_default("definitely/not/here/config.toml").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_day_type_labels() {
        assert_eq!(DayType::Holiday.label(), "Festivo");
        assert_eq!(format!("{}", DayType::Workday), "Laboral");
    }
}
