//! Prediction and inference
//!
//! Resolve per-facility models and generate occupancy predictions.

pub mod inference;

pub use inference::{predict_count, round_count, run_model, Predictor};
