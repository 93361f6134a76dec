use std::sync::Arc;

use tracing::debug;

use super::rollout::{rollout, RolloutStep};
use super::{ForecastError, ForecastResult, Horizon};
use crate::data::PriceHistoryStore;
use crate::domain::{CropStateKey, ForecastPoint, PriceSeries};
use crate::registry::{ModelEntry, ModelRegistry};

/// Entry point for predictions: resolves the pair's model and history, then
/// rolls the model forward.
///
/// Cheap to clone and safe to share across threads. Each call works on its
/// own copy of the history tail.
#[derive(Clone)]
pub struct Forecaster {
    registry: Arc<ModelRegistry>,
    history: Arc<dyn PriceHistoryStore>,
}

impl Forecaster {
    pub fn new(registry: Arc<ModelRegistry>, history: Arc<dyn PriceHistoryStore>) -> Self {
        Self { registry, history }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn history(&self) -> &dyn PriceHistoryStore {
        self.history.as_ref()
    }

    /// Price for the day after the last known observation.
    pub fn predict_next(&self, crop: &str, state: &str) -> Result<ForecastPoint, ForecastError> {
        let steps = self.trace(crop, state, Horizon::new(1)?)?;
        steps
            .first()
            .map(RolloutStep::point)
            .ok_or_else(|| ForecastError::InvalidParameter("empty forecast".into()))
    }

    /// `horizon` days of recursive forecast plus a trend summary.
    pub fn forecast(
        &self,
        crop: &str,
        state: &str,
        horizon: Horizon,
    ) -> Result<ForecastResult, ForecastError> {
        let steps = self.trace(crop, state, horizon)?;
        let points = steps.iter().map(RolloutStep::point).collect();
        let result = ForecastResult::from_points(CropStateKey::new(crop, state), points);
        debug!(
            crop,
            state,
            days = horizon.days(),
            start = result.start_price,
            end = result.end_price,
            trend = %result.trend.label,
            "forecast complete"
        );
        Ok(result)
    }

    /// The full per-step rollout record.
    pub fn trace(
        &self,
        crop: &str,
        state: &str,
        horizon: Horizon,
    ) -> Result<Vec<RolloutStep>, ForecastError> {
        let (entry, series) = self.resolve(crop, state)?;
        rollout(&entry, &series, horizon)
    }

    /// Model first, then history: an untrained pair is reported as such
    /// even when it also has no data.
    fn resolve(
        &self,
        crop: &str,
        state: &str,
    ) -> Result<(Arc<ModelEntry>, Arc<PriceSeries>), ForecastError> {
        let entry = self.registry.lookup(crop, state)?;
        let series = self.history.series(&entry.key)?;
        Ok((entry, series))
    }
}
