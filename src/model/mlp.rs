//! MLP occupancy regressor
//!
//! Architecture: Input(5) → Hidden(h1) → ReLU → … → Hidden(hn) → ReLU → Linear(1)

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use std::path::Path;

use super::Regressor;
use crate::features::FeatureVector;
use crate::{ParkingError, Result};

/// Configuration for the MLP regressor
#[derive(Debug, Clone)]
pub struct MLPConfig {
    /// Input dimension (encoded selections)
    pub input_dim: usize,
    /// Hidden layer dimensions (e.g., [64, 32] for two layers)
    pub hidden_dims: Vec<usize>,
}

impl Default for MLPConfig {
    fn default() -> Self {
        MLPConfig {
            input_dim: FeatureVector::DIM,
            hidden_dims: vec![64, 32],
        }
    }
}

impl MLPConfig {
    pub fn with_hidden_dims(hidden_dims: Vec<usize>) -> Self {
        MLPConfig {
            input_dim: FeatureVector::DIM,
            hidden_dims,
        }
    }
}

/// A single hidden layer block: Linear → ReLU
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        relu(self.linear.forward(x))
    }
}

/// Multi-layer perceptron with a single regression output
#[derive(Module, Debug)]
pub struct MLPModel<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    head: Linear<B>,
}

impl<B: Backend> MLPModel<B> {
    /// Create a new MLP model
    pub fn new(device: &B::Device, config: MLPConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = config.input_dim;
        for &out_dim in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, out_dim));
            in_dim = out_dim;
        }

        MLPModel {
            hidden,
            head: LinearConfig::new(in_dim, 1).init(device),
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Encoded selections [batch, input_dim]
    ///
    /// # Returns
    /// Occupancy estimates [batch, 1]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden.iter().fold(x, |x, block| block.forward(x));
        self.head.forward(x)
    }

    /// Save model to file (the recorder appends `.mpk`)
    pub fn save(&self, path: &Path) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.to_path_buf())
            .map_err(|e| ParkingError::Model(e.to_string()))
    }

    /// Load model from file
    pub fn load(device: &B::Device, path: &Path, config: MLPConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.to_path_buf(), device)
            .map_err(|e| ParkingError::Model(e.to_string()))?;

        let model = Self::new(device, config);
        Ok(model.load_record(record))
    }
}

/// MLP bound to a device, usable as a [`Regressor`]
pub struct MLPRegressor<B: Backend> {
    model: MLPModel<B>,
    device: B::Device,
    hidden_dims: Vec<usize>,
}

impl<B: Backend> MLPRegressor<B>
where
    B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
    B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new(model: MLPModel<B>, device: B::Device, hidden_dims: Vec<usize>) -> Self {
        MLPRegressor {
            model,
            device,
            hidden_dims,
        }
    }

    /// Load an `.mpk` record with the given hidden layer layout
    pub fn load(path: &Path, hidden_dims: Vec<usize>) -> Result<Self> {
        let device = B::Device::default();
        let config = MLPConfig::with_hidden_dims(hidden_dims.clone());
        let model = MLPModel::load(&device, &path.with_extension(""), config)?;
        Ok(Self::new(model, device, hidden_dims))
    }
}

impl<B: Backend> Regressor for MLPRegressor<B> {
    fn predict(&self, features: &FeatureVector) -> Result<f32> {
        let input = Tensor::<B, 1>::from_floats(features.to_vec().as_slice(), &self.device)
            .reshape([1, FeatureVector::DIM]);
        let output = self.model.forward(input);

        let values = output
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ParkingError::Model(format!("{:?}", e)))?;
        values
            .first()
            .copied()
            .ok_or_else(|| ParkingError::Model("model produced no output".to_string()))
    }

    fn describe(&self) -> String {
        format!("MLP regressor (hidden layers {:?})", self.hidden_dims)
    }
}
