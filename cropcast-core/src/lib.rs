//! CropCast Core: price series, feature engineering, model registry and the
//! recursive forecast engine for crop × state market prices.
//!
//! - Domain types (observations, series, crop–state keys)
//! - Price history store trait, in-memory store, CSV import with daily resampling
//! - 12-field feature builder with a no-lookahead guard
//! - Linear and tree-ensemble regressors decoded from JSON model files
//! - Write-once model registry
//! - Recursive multi-day rollout and trend summary

pub mod data;
pub mod domain;
pub mod engine;
pub mod features;
pub mod model;
pub mod registry;
pub mod trend;

pub use domain::{CropStateKey, ForecastPoint, PriceObservation, PriceSeries};
pub use engine::{ForecastError, ForecastResult, Forecaster, Horizon};
pub use registry::{ModelEntry, ModelRegistry, RegistryError};
pub use trend::{summarize, TrendLabel, TrendSummary};
