//! Rendering of prediction outcomes
//!
//! Front ends share one encoder and predictor and differ only in how they
//! show the result.

pub mod form;

use std::fmt;
use std::str::FromStr;

use crate::PredictionOutcome;

/// Renders one prediction outcome for display
pub trait Presenter {
    fn render(&self, outcome: &PredictionOutcome) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl OutputFormat {
    pub fn presenter(self) -> Box<dyn Presenter> {
        match self {
            OutputFormat::Table => Box::new(TextPresenter),
            OutputFormat::Json => Box::new(JsonPresenter),
            OutputFormat::Csv => Box::new(CsvPresenter),
        }
    }
}

/// Headline sentence for a prediction
pub fn result_message(outcome: &PredictionOutcome) -> String {
    let s = &outcome.selection;
    format!(
        "La predicción de ocupación en {}, para el día {} de {} a las {} horas, es de: {} vehículos",
        s.facility, s.day, s.month, s.hour, outcome.count
    )
}

/// Day-type and weather reminder shown under the headline
pub fn detail_message(outcome: &PredictionOutcome) -> String {
    format!(
        "A su vez hay que tener en cuenta que es un día {} y {}.",
        outcome.day_type, outcome.selection.precipitation
    )
}

pub fn model_message(outcome: &PredictionOutcome) -> String {
    format!("El modelo usado es -> {}", outcome.model_path.display())
}

/// Boxed human-readable summary
pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn render(&self, outcome: &PredictionOutcome) -> String {
        format!(
            r#"
┌─────────────────────────────────────────────────┐
│  {}
├─────────────────────────────────────────────────┤
│  {}
│  {}
│  Features:  {:?}
│  {}
└─────────────────────────────────────────────────┘
"#,
            outcome.selection.facility,
            result_message(outcome),
            detail_message(outcome),
            outcome.features.to_array(),
            model_message(outcome),
        )
    }
}

pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn render(&self, outcome: &PredictionOutcome) -> String {
        let json = serde_json::json!({
            "data": outcome,
            "message": result_message(outcome),
            "detail": detail_message(outcome),
        });
        serde_json::to_string_pretty(&json).unwrap_or_default()
    }
}

pub struct CsvPresenter;

impl Presenter for CsvPresenter {
    fn render(&self, outcome: &PredictionOutcome) -> String {
        let s = &outcome.selection;
        format!(
            "facility,month,day,hour,precipitation,day_type,raw,count,model\n{},{},{},{},{},{},{:.3},{},{}\n",
            csv_field(&s.facility),
            csv_field(&s.month),
            csv_field(&s.day),
            csv_field(&s.hour),
            csv_field(&s.precipitation),
            outcome.day_type,
            outcome.raw,
            outcome.count,
            csv_field(&outcome.model_path.display().to_string()),
        )
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
