//! Shared server state.

use std::sync::Arc;

use cropcast_core::Forecaster;

/// Handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub forecaster: Forecaster,
    /// Crop names served by `/api/crops`.
    pub crops: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(forecaster: Forecaster, crops: Vec<String>) -> Self {
        Self {
            forecaster,
            crops: Arc::new(crops),
        }
    }
}
