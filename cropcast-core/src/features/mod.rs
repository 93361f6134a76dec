//! Feature engineering: the fixed 12-field input of every price model.
//!
//! A `FeatureVector` is computed for an anchor date `d` from observations
//! strictly before `d`:
//! - temporal: day of month, month, day of week (Monday = 0), ISO week
//! - lags: price at d-1, d-7, d-14, d-30
//! - rolling: mean over the trailing 7/14/30 days ending at d-1, sample
//!   standard deviation over the trailing 7 days
//!
//! # Look-ahead guard
//! The builder only ever sees `PriceSeries::before(anchor)`, so the anchor's
//! own price (or anything later) cannot reach its features.

pub mod builder;
pub mod rolling;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use builder::{FeatureBuilder, FeatureWindow};

/// Longest lag/rolling window, i.e. the history needed before an anchor.
pub const LOOKBACK_DAYS: usize = 30;

/// Feature names in model-input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "dayofweek")]
    DayOfWeek,
    #[serde(rename = "weekofyear")]
    WeekOfYear,
    #[serde(rename = "lag_1")]
    Lag1,
    #[serde(rename = "lag_7")]
    Lag7,
    #[serde(rename = "lag_14")]
    Lag14,
    #[serde(rename = "lag_30")]
    Lag30,
    #[serde(rename = "ma_7")]
    Ma7,
    #[serde(rename = "ma_14")]
    Ma14,
    #[serde(rename = "ma_30")]
    Ma30,
    #[serde(rename = "std_7")]
    Std7,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::Day,
        Feature::Month,
        Feature::DayOfWeek,
        Feature::WeekOfYear,
        Feature::Lag1,
        Feature::Lag7,
        Feature::Lag14,
        Feature::Lag30,
        Feature::Ma7,
        Feature::Ma14,
        Feature::Ma30,
        Feature::Std7,
    ];

    /// Column name as used in model files.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Day => "day",
            Feature::Month => "month",
            Feature::DayOfWeek => "dayofweek",
            Feature::WeekOfYear => "weekofyear",
            Feature::Lag1 => "lag_1",
            Feature::Lag7 => "lag_7",
            Feature::Lag14 => "lag_14",
            Feature::Lag30 => "lag_30",
            Feature::Ma7 => "ma_7",
            Feature::Ma14 => "ma_14",
            Feature::Ma30 => "ma_30",
            Feature::Std7 => "std_7",
        }
    }

    /// Position in `FeatureVector::to_array`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Model input for one anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub day: f64,
    pub month: f64,
    pub dayofweek: f64,
    pub weekofyear: f64,
    pub lag_1: f64,
    pub lag_7: f64,
    pub lag_14: f64,
    pub lag_30: f64,
    pub ma_7: f64,
    pub ma_14: f64,
    pub ma_30: f64,
    pub std_7: f64,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Day => self.day,
            Feature::Month => self.month,
            Feature::DayOfWeek => self.dayofweek,
            Feature::WeekOfYear => self.weekofyear,
            Feature::Lag1 => self.lag_1,
            Feature::Lag7 => self.lag_7,
            Feature::Lag14 => self.lag_14,
            Feature::Lag30 => self.lag_30,
            Feature::Ma7 => self.ma_7,
            Feature::Ma14 => self.ma_14,
            Feature::Ma30 => self.ma_30,
            Feature::Std7 => self.std_7,
        }
    }

    /// Values in `Feature::ALL` order.
    pub fn to_array(&self) -> [f64; 12] {
        Feature::ALL.map(|f| self.get(f))
    }
}

/// Why a feature vector could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("insufficient history before {anchor}: {available} observations, {required} required")]
    InsufficientHistory {
        anchor: NaiveDate,
        available: usize,
        required: usize,
    },

    #[error("price for {missing} is missing (needed for anchor {anchor})")]
    NonContiguousSeries {
        anchor: NaiveDate,
        missing: NaiveDate,
    },
}
