use chrono::NaiveDate;
use thiserror::Error;

use crate::data::HistoryError;
use crate::domain::CropStateKey;
use crate::features::FeatureError;
use crate::registry::RegistryError;

/// Everything a forecast request can fail with.
///
/// All variants are deterministic functions of the request and the loaded
/// state, so none of them is worth retrying unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("model not found for {crop} in {state}")]
    UnknownCombination { crop: String, state: String },

    #[error(
        "not enough price history for {crop} in {state}: {available} days before {anchor}, {required} required"
    )]
    InsufficientHistory {
        crop: String,
        state: String,
        anchor: NaiveDate,
        available: usize,
        required: usize,
    },

    #[error("price history for {crop} in {state} has no entry for {missing} (needed to forecast {anchor})")]
    NonContiguousSeries {
        crop: String,
        state: String,
        anchor: NaiveDate,
        missing: NaiveDate,
    },

    #[error("no price history found for {crop} in {state}")]
    NoHistory { crop: String, state: String },

    #[error("{0}")]
    InvalidParameter(String),

    #[error("model for {crop} in {state} returned a non-finite price for {date}")]
    NonFinitePrediction {
        crop: String,
        state: String,
        date: NaiveDate,
    },

    #[error("model registry unavailable: {0}")]
    ModelLoad(String),
}

impl ForecastError {
    /// Attach the pair to a feature-building failure.
    pub fn from_feature(key: &CropStateKey, err: FeatureError) -> Self {
        match err {
            FeatureError::InsufficientHistory {
                anchor,
                available,
                required,
            } => ForecastError::InsufficientHistory {
                crop: key.crop.clone(),
                state: key.state.clone(),
                anchor,
                available,
                required,
            },
            FeatureError::NonContiguousSeries { anchor, missing } => {
                ForecastError::NonContiguousSeries {
                    crop: key.crop.clone(),
                    state: key.state.clone(),
                    anchor,
                    missing,
                }
            }
        }
    }

    /// Caller error (bad request or unforecastable pair) as opposed to a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ForecastError::ModelLoad(_) | ForecastError::NonFinitePrediction { .. }
        )
    }
}

impl From<HistoryError> for ForecastError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoHistory { crop, state } => ForecastError::NoHistory { crop, state },
        }
    }
}

impl From<RegistryError> for ForecastError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownCombination { crop, state } => {
                ForecastError::UnknownCombination { crop, state }
            }
            other => ForecastError::ModelLoad(other.to_string()),
        }
    }
}
