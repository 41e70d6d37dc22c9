//! Feature extraction and encoding
//!
//! Converts user selections into model-ready features.

pub mod calendar;
pub mod category;
pub mod encoding;

pub use calendar::HolidayCalendar;
pub use category::CategoryMap;
pub use encoding::{FeatureEncoder, FeatureVector};
