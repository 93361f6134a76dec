//! Crop–state pair: the unit of forecasting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one forecastable market: a crop traded in a state.
///
/// One trained model and one price series exist per key. Matching is exact
/// and case-sensitive; callers are expected to pass catalog spellings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CropStateKey {
    pub crop: String,
    pub state: String,
}

impl CropStateKey {
    pub fn new(crop: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            state: state.into(),
        }
    }
}

impl fmt::Display for CropStateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.crop, self.state)
    }
}
