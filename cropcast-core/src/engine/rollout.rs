//! Recursive multi-day rollout.
//!
//! The model only ever predicts one day ahead. To go further, each day's
//! prediction is appended to a private working series and becomes history
//! for the next day's features: on day `i > 1`, `lag_1` is day `i-1`'s
//! prediction, and on day `i > 7` the whole `ma_7` window is predictions.
//!
//! The working series starts as a copy of the last `LOOKBACK_DAYS` known
//! observations. The shared history is never touched. Steps run strictly in
//! order; step `i` reads step `i-1`'s output.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

use super::{ForecastError, Horizon};
use crate::domain::{round2, CropStateKey, ForecastPoint, PriceObservation, PriceSeries};
use crate::features::{FeatureBuilder, FeatureVector, LOOKBACK_DAYS};
use crate::registry::{ModelEntry, ModelRegistry};

/// One day of a rollout, with everything needed to audit it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloutStep {
    /// 1-based day number within the forecast.
    pub step: u32,
    pub anchor: NaiveDate,
    pub features: FeatureVector,
    /// Unrounded model output, as fed back into the working series.
    pub raw_prediction: f64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Working series length after this step's prediction was appended.
    pub working_len: usize,
}

impl RolloutStep {
    pub fn point(&self) -> ForecastPoint {
        ForecastPoint {
            date: self.anchor,
            price: round2(self.raw_prediction),
        }
    }
}

/// Roll `entry`'s model forward `horizon` days past the end of `history`.
pub fn rollout(
    entry: &ModelEntry,
    history: &PriceSeries,
    horizon: Horizon,
) -> Result<Vec<RolloutStep>, ForecastError> {
    let key = &entry.key;
    let builder = FeatureBuilder::new();
    let mut working = history.tail(LOOKBACK_DAYS);
    let mut last = history.last_date().ok_or_else(|| no_history(key))?;
    let mut steps = Vec::with_capacity(horizon.days() as usize);

    for step in 1..=horizon.days() {
        let anchor = last.succ_opt().ok_or_else(|| {
            ForecastError::InvalidParameter(format!("cannot forecast past {last}"))
        })?;

        let (features, window) = builder
            .build_with_window(&working, anchor)
            .map_err(|e| ForecastError::from_feature(key, e))?;
        let raw = ModelRegistry::infer(entry, &features);

        // The anchor always follows the last working date, so only a
        // non-finite price can be refused here.
        working
            .push(PriceObservation::new(anchor, raw))
            .map_err(|_| ForecastError::NonFinitePrediction {
                crop: key.crop.clone(),
                state: key.state.clone(),
                date: anchor,
            })?;

        trace!(
            key = %key,
            step,
            %anchor,
            lag_1 = features.lag_1,
            ma_7 = features.ma_7,
            raw,
            "rollout step"
        );

        steps.push(RolloutStep {
            step,
            anchor,
            features,
            raw_prediction: raw,
            window_start: window.start,
            window_end: window.end,
            working_len: working.len(),
        });
        last = anchor;
    }

    Ok(steps)
}

fn no_history(key: &CropStateKey) -> ForecastError {
    ForecastError::NoHistory {
        crop: key.crop.clone(),
        state: key.state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FnRegressor;
    use chrono::Duration;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn flat(start: NaiveDate, n: usize, price: f64) -> PriceSeries {
        PriceSeries::new(
            (0..n)
                .map(|i| PriceObservation::new(start + Duration::days(i as i64), price))
                .collect(),
        )
        .unwrap()
    }

    fn entry(f: impl Fn(&FeatureVector) -> f64 + Send + Sync + 'static) -> ModelEntry {
        ModelEntry::new(
            CropStateKey::new("Potato", "Punjab"),
            Arc::new(FnRegressor::new("fixture", f)),
        )
    }

    #[test]
    fn predictions_feed_next_lag() {
        // next = yesterday + 10
        let model = entry(|v| v.lag_1 + 10.0);
        let history = flat(d(2024, 1, 1), 40, 1000.0);
        let steps = rollout(&model, &history, Horizon::new(5).unwrap()).unwrap();

        let prices: Vec<f64> = steps.iter().map(|s| s.raw_prediction).collect();
        assert_eq!(prices, vec![1010.0, 1020.0, 1030.0, 1040.0, 1050.0]);
        assert_eq!(steps[0].anchor, d(2024, 2, 10));
        assert_eq!(steps[4].anchor, d(2024, 2, 14));
        assert_eq!(steps[3].features.lag_1, 1030.0);
    }

    #[test]
    fn moving_average_fills_with_predictions() {
        let model = entry(|v| v.lag_1 + 7.0);
        let history = flat(d(2024, 1, 1), 30, 700.0);
        let steps = rollout(&model, &history, Horizon::new(9).unwrap()).unwrap();

        // Day 8's ma_7 covers predictions of days 1..=7: 707, 714, ..., 749
        assert_eq!(steps[7].features.ma_7, 728.0);
        // Day 8's lag_7 is day 1's prediction
        assert_eq!(steps[7].features.lag_7, 707.0);
        // lag_30 still reaches into known history
        assert_eq!(steps[7].features.lag_30, 700.0);
    }

    #[test]
    fn working_series_grows_by_one_per_step() {
        let model = entry(|v| v.ma_30);
        let history = flat(d(2024, 1, 1), 90, 500.0);
        let steps = rollout(&model, &history, Horizon::new(30).unwrap()).unwrap();

        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.working_len, LOOKBACK_DAYS + i + 1);
            assert_eq!(step.window_end, step.anchor - Duration::days(1));
            assert_eq!(step.window_start, step.anchor - Duration::days(30));
        }
        // shared history untouched
        assert_eq!(history.len(), 90);
    }

    #[test]
    fn short_history_is_insufficient() {
        let model = entry(|_| 1.0);
        let history = flat(d(2024, 1, 1), 20, 500.0);
        let err = rollout(&model, &history, Horizon::DEFAULT).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory { available: 20, required: 30, .. }
        ));
    }

    #[test]
    fn empty_history_is_no_history() {
        let model = entry(|_| 1.0);
        let err = rollout(&model, &PriceSeries::default(), Horizon::DEFAULT).unwrap_err();
        assert!(matches!(err, ForecastError::NoHistory { .. }));
    }

    #[test]
    fn nan_prediction_is_rejected() {
        let model = entry(|_| f64::NAN);
        let history = flat(d(2024, 1, 1), 30, 500.0);
        let err = rollout(&model, &history, Horizon::DEFAULT).unwrap_err();
        assert_eq!(
            err,
            ForecastError::NonFinitePrediction {
                crop: "Potato".into(),
                state: "Punjab".into(),
                date: d(2024, 1, 31)
            }
        );
    }

    #[test]
    fn point_rounds_reported_price() {
        let model = entry(|_| 1234.5678);
        let history = flat(d(2024, 1, 1), 30, 500.0);
        let steps = rollout(&model, &history, Horizon::new(1).unwrap()).unwrap();
        assert_eq!(steps[0].point().price, 1234.57);
        assert_eq!(steps[0].raw_prediction, 1234.5678);
    }
}
