use serde::Serialize;

use crate::domain::{CropStateKey, ForecastPoint};
use crate::trend::{summarize, TrendSummary};

/// A finished N-day forecast.
///
/// `start_price` and `end_price` are the first and last reported prices. For
/// a 1-day forecast they are the same point, so the trend is `Stable` with a
/// 0 % change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub key: CropStateKey,
    pub points: Vec<ForecastPoint>,
    pub start_price: f64,
    pub end_price: f64,
    pub trend: TrendSummary,
}

impl ForecastResult {
    /// Summarize already-rounded points. The engine never passes an empty
    /// list; an empty one summarizes as zero prices.
    pub fn from_points(key: CropStateKey, points: Vec<ForecastPoint>) -> Self {
        let start_price = points.first().map_or(0.0, |p| p.price);
        let end_price = points.last().map_or(0.0, |p| p.price);
        Self {
            key,
            points,
            start_price,
            end_price,
            trend: summarize(start_price, end_price),
        }
    }

    pub fn days(&self) -> usize {
        self.points.len()
    }
}
