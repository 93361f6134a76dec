//! Price history store trait and its error type.
//!
//! The engine only ever reads history through this trait, so the backing
//! store (CSV snapshot, database, test fixture) can be swapped freely.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::{CropStateKey, PriceSeries};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("no price history found for {crop} in {state}")]
    NoHistory { crop: String, state: String },
}

/// Read-only access to per-pair price history.
///
/// Series are handed out as shared immutable snapshots; callers that need to
/// extend one must copy it first.
pub trait PriceHistoryStore: Send + Sync {
    /// The full known history for a pair.
    fn series(&self, key: &CropStateKey) -> Result<Arc<PriceSeries>, HistoryError>;

    /// Distinct crop names, sorted.
    fn crops(&self) -> Vec<String>;

    /// Distinct state names, sorted, optionally restricted to one crop.
    fn states(&self, crop: Option<&str>) -> Vec<String>;
}
