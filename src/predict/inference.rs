//! Model inference for predictions

use std::path::PathBuf;

use crate::features::category::FACILITIES;
use crate::features::{FeatureEncoder, FeatureVector, HolidayCalendar};
use crate::model::{load_model, Regressor};
use crate::{Config, ModelsConfig, ParkingError, PredictionOutcome, Result, Selection};

/// Round a raw model output to a vehicle count, half away from zero
///
/// NaN and infinite outputs are model failures, not counts.
pub fn round_count(raw: f32) -> Result<i64> {
    if !raw.is_finite() {
        return Err(ParkingError::Model(format!("non-finite model output {}", raw)));
    }
    Ok(raw.round() as i64)
}

/// Run the model and return its raw output with the rounded count
pub fn run_model(features: &FeatureVector, model: &dyn Regressor) -> Result<(f32, i64)> {
    let raw = model.predict(features)?;
    Ok((raw, round_count(raw)?))
}

/// Run the model on one feature vector and round its output
///
/// Library entry point for callers that only need the count; front ends go
/// through [`Predictor::predict`] for the full outcome.
pub fn predict_count(features: &FeatureVector, model: &dyn Regressor) -> Result<i64> {
    run_model(features, model).map(|(_, count)| count)
}

/// Predictor for parking occupancy
///
/// Holds no model: the artifact for the selected facility is read from disk
/// on every request.
pub struct Predictor {
    encoder: FeatureEncoder,
    models: ModelsConfig,
    clamp_negative: bool,
}

impl Predictor {
    /// Create a new predictor
    pub fn new(encoder: FeatureEncoder, models: ModelsConfig, clamp_negative: bool) -> Self {
        Predictor {
            encoder,
            models,
            clamp_negative,
        }
    }

    /// Build the calendar and encoder described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let calendar = HolidayCalendar::from_config(&config.calendar)?;
        Ok(Self::new(
            FeatureEncoder::new(calendar),
            config.models.clone(),
            config.prediction.clamp_negative,
        ))
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Model artifact path for a facility label
    pub fn model_path(&self, facility: &str) -> Result<PathBuf> {
        FACILITIES.code(facility)?;
        let file_name = self
            .models
            .template
            .replace("{facility}", &facility.to_lowercase());
        Ok(PathBuf::from(&self.models.directory).join(file_name))
    }

    /// Encode, load the facility's model, predict
    pub fn predict(&self, selection: &Selection) -> Result<PredictionOutcome> {
        let features = self.encoder.encode_selection(selection)?;
        let model_path = self.model_path(&selection.facility)?;
        let model = load_model(&model_path, &self.models)?;
        self.predict_with(selection, features, model.as_ref(), model_path)
    }

    /// Predict with an already loaded model
    pub fn predict_with(
        &self,
        selection: &Selection,
        features: FeatureVector,
        model: &dyn Regressor,
        model_path: PathBuf,
    ) -> Result<PredictionOutcome> {
        log::debug!("Features for {}: {:?}", selection.facility, features.to_array());

        let (raw, mut count) = run_model(&features, model)?;
        log::debug!("Raw model output {} -> {}", raw, count);

        if count < 0 && self.clamp_negative {
            log::warn!(
                "Negative occupancy {} for {} clamped to 0",
                count,
                selection.facility
            );
            count = 0;
        }

        Ok(PredictionOutcome {
            selection: selection.clone(),
            day_type: features.day_type(),
            features,
            raw,
            count,
            model_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forest::{Aggregation, Node, SplitComparison, Tree, TreeEnsemble};
    use crate::DayType;

    struct ConstantModel(f32);

    impl Regressor for ConstantModel {
        fn predict(&self, _features: &FeatureVector) -> Result<f32> {
            Ok(self.0)
        }

        fn describe(&self) -> String {
            "constant".to_string()
        }
    }

    fn selection(month: &str, day: &str, hour: &str, facility: &str, precip: &str) -> Selection {
        Selection {
            month: month.to_string(),
            day: day.to_string(),
            hour: hour.to_string(),
            facility: facility.to_string(),
            precipitation: precip.to_string(),
        }
    }

    fn predictor_in(directory: &str, clamp_negative: bool) -> Predictor {
        let mut config = Config::default();
        config.models.directory = directory.to_string();
        config.prediction.clamp_negative = clamp_negative;
        Predictor::from_config(&config).unwrap()
    }

    #[test]
    fn test_rounding_boundaries() {
        assert_eq!(round_count(4.5).unwrap(), 5);
        assert_eq!(round_count(4.49999).unwrap(), 4);
        assert_eq!(round_count(5.5).unwrap(), 6);
        assert_eq!(round_count(-4.5).unwrap(), -5);
        assert_eq!(round_count(0.4).unwrap(), 0);
    }

    #[test]
    fn test_non_finite_output_is_model_error() {
        assert!(matches!(round_count(f32::NAN), Err(ParkingError::Model(_))));
        assert!(matches!(
            round_count(f32::INFINITY),
            Err(ParkingError::Model(_))
        ));
        assert!(matches!(
            round_count(f32::NEG_INFINITY),
            Err(ParkingError::Model(_))
        ));

        let v = FeatureVector::from([3, 15, 12, 1, 1]);
        assert!(matches!(
            predict_count(&v, &ConstantModel(f32::NAN)),
            Err(ParkingError::Model(_))
        ));
    }

    #[test]
    fn test_nan_output_aborts_prediction() {
        let predictor = predictor_in("modelos", true);
        let sel = selection("Marzo", "15", "12:00", "MATA", "lluvioso");
        let features = predictor.encoder().encode_selection(&sel).unwrap();
        let result = predictor.predict_with(
            &sel,
            features,
            &ConstantModel(f32::NAN),
            PathBuf::from("m.mpk"),
        );
        assert!(matches!(result, Err(ParkingError::Model(_))));
    }

    #[test]
    fn test_predict_count() {
        let v = FeatureVector::from([1, 1, 0, 0, 0]);
        assert_eq!(predict_count(&v, &ConstantModel(41.6)).unwrap(), 42);
    }

    #[test]
    fn test_model_path_lowercases_facility() {
        let predictor = predictor_in("modelos", true);
        assert_eq!(
            predictor.model_path("RINCÓN").unwrap(),
            PathBuf::from("modelos").join("xgb_trained_model_rincón.json")
        );
        assert_eq!(
            predictor.model_path("SAN BERNARDO").unwrap(),
            PathBuf::from("modelos").join("xgb_trained_model_san bernardo.json")
        );
        assert!(predictor.model_path("Mata").is_err());
    }

    #[test]
    fn test_negative_clamped() {
        let predictor = predictor_in("modelos", true);
        let sel = selection("Enero", "1", "03:00", "ELDER", "Sin lluvia");
        let features = predictor.encoder().encode_selection(&sel).unwrap();
        let outcome = predictor
            .predict_with(&sel, features, &ConstantModel(-3.2), PathBuf::from("m.json"))
            .unwrap();
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.raw, -3.2);
    }

    #[test]
    fn test_negative_kept_without_clamp() {
        let predictor = predictor_in("modelos", false);
        let sel = selection("Enero", "1", "03:00", "ELDER", "Sin lluvia");
        let features = predictor.encoder().encode_selection(&sel).unwrap();
        let outcome = predictor
            .predict_with(&sel, features, &ConstantModel(-3.2), PathBuf::from("m.json"))
            .unwrap();
        assert_eq!(outcome.count, -3);
    }

    #[test]
    fn test_missing_model_is_reported() {
        let predictor = predictor_in("no/such/models", true);
        let sel = selection("Marzo", "15", "12:00", "MATA", "lluvioso");
        assert!(matches!(
            predictor.predict(&sel),
            Err(ParkingError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_label_fails_before_loading() {
        let predictor = predictor_in("no/such/models", true);
        let sel = selection("Marzo", "15", "12:00", "MATA", "granizo");
        assert!(matches!(
            predictor.predict(&sel),
            Err(ParkingError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_end_to_end_with_tree_model() {
        let dir = std::env::temp_dir().join(format!("parking_predict_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // Busier on workdays
        let model = TreeEnsemble {
            aggregation: Aggregation::Sum,
            comparison: SplitComparison::Less,
            base_score: 200.0,
            trees: vec![Tree {
                nodes: vec![
                    Node::Split {
                        feature: 4,
                        threshold: 0.5,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf { value: -80.4 },
                    Node::Leaf { value: 50.5 },
                ],
            }],
        };
        model.save(&dir.join("xgb_trained_model_mata.json")).unwrap();

        let predictor = predictor_in(dir.to_str().unwrap(), true);

        let sel = selection("Marzo", "15", "12:00", "MATA", "lluvioso");
        let outcome = predictor.predict(&sel).unwrap();
        assert_eq!(outcome.features.to_array(), [3, 15, 12, 1, 1]);
        assert_eq!(outcome.day_type, DayType::Workday);
        assert_eq!(outcome.count, 251);
        assert_eq!(outcome.model_path, dir.join("xgb_trained_model_mata.json"));

        let sel = selection("Enero", "1", "00:00", "MATA", "Sin lluvia");
        let outcome = predictor.predict(&sel).unwrap();
        assert_eq!(outcome.day_type, DayType::Holiday);
        assert_eq!(outcome.count, 120);

        std::fs::remove_dir_all(&dir).ok();
    }
}
