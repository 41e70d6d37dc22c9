//! Occupancy regression models
//!
//! Two artifact formats, picked by file extension:
//! - `.json`: decision tree ensemble (boosted or random forest)
//! - `.mpk`: MLP regressor record

pub mod forest;
pub mod mlp;

pub use forest::TreeEnsemble;
pub use mlp::{MLPModel, MLPRegressor};

use std::fmt;
use std::path::Path;

use crate::features::FeatureVector;
use crate::{ModelsConfig, ParkingError, Result};

/// Backend used for neural network inference
pub type InferenceBackend = burn::backend::NdArray<f32>;

/// Single-vector-in, single-scalar-out prediction
pub trait Regressor {
    fn predict(&self, features: &FeatureVector) -> Result<f32>;

    /// Short human-readable description of the model
    fn describe(&self) -> String;
}

/// Serialized model format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    TreeEnsemble,
    Mlp,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ModelFormat::TreeEnsemble),
            Some("mpk") => Ok(ModelFormat::Mlp),
            other => Err(ParkingError::Model(format!(
                "unsupported model format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFormat::TreeEnsemble => write!(f, "tree ensemble (JSON)"),
            ModelFormat::Mlp => write!(f, "MLP (MessagePack record)"),
        }
    }
}

/// Load the model stored at `path`
pub fn load_model(path: &Path, config: &ModelsConfig) -> Result<Box<dyn Regressor>> {
    if !path.exists() {
        return Err(ParkingError::ModelNotFound(path.to_path_buf()));
    }

    let format = ModelFormat::from_path(path)?;
    log::info!("Loading {} model from {}", format, path.display());

    match format {
        ModelFormat::TreeEnsemble => Ok(Box::new(TreeEnsemble::load(path)?)),
        ModelFormat::Mlp => Ok(Box::new(MLPRegressor::<InferenceBackend>::load(
            path,
            config.mlp.hidden_dims.clone(),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ModelFormat::from_path(Path::new("m/xgb_trained_model_mata.json")).unwrap(),
            ModelFormat::TreeEnsemble
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("m/rf_trained_model_mata.mpk")).unwrap(),
            ModelFormat::Mlp
        );
        assert!(ModelFormat::from_path(Path::new("m/xgb_trained_model_mata.pkl")).is_err());
        assert!(ModelFormat::from_path(Path::new("m/model")).is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let config = Config::default();
        let path = Path::new("no/such/dir/xgb_trained_model_elder.json");
        match load_model(path, &config.models) {
            Err(ParkingError::ModelNotFound(p)) => assert_eq!(p, path),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }
}
