//! Feature builder: price series + anchor date → `FeatureVector`.

use chrono::{Datelike, NaiveDate};

use super::rolling::{trailing_mean, trailing_std};
use super::{FeatureError, FeatureVector, LOOKBACK_DAYS};
use crate::domain::{PriceObservation, PriceSeries};

/// The trailing observations a feature vector was computed from.
///
/// Always exactly `LOOKBACK_DAYS` consecutive days ending the day before
/// the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureWindow {
    pub anchor: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Stateless feature builder. Pure function of (series, anchor).
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Compute the feature vector for `anchor`.
    pub fn build(
        &self,
        series: &PriceSeries,
        anchor: NaiveDate,
    ) -> Result<FeatureVector, FeatureError> {
        self.build_with_window(series, anchor).map(|(v, _)| v)
    }

    /// Compute the feature vector and report the window it was read from.
    pub fn build_with_window(
        &self,
        series: &PriceSeries,
        anchor: NaiveDate,
    ) -> Result<(FeatureVector, FeatureWindow), FeatureError> {
        let window = self.window(series, anchor)?;

        let lag = |k: usize| window[LOOKBACK_DAYS - k].price;
        // Window length was checked above, so every rolling stat is defined.
        let mean = |w: usize| trailing_mean(window, w).unwrap_or(f64::NAN);

        let vector = FeatureVector {
            day: f64::from(anchor.day()),
            month: f64::from(anchor.month()),
            dayofweek: f64::from(anchor.weekday().num_days_from_monday()),
            weekofyear: f64::from(anchor.iso_week().week()),
            lag_1: lag(1),
            lag_7: lag(7),
            lag_14: lag(14),
            lag_30: lag(30),
            ma_7: mean(7),
            ma_14: mean(14),
            ma_30: mean(30),
            std_7: trailing_std(window, 7).unwrap_or(f64::NAN),
        };

        let span = FeatureWindow {
            anchor,
            start: window[0].date,
            end: window[LOOKBACK_DAYS - 1].date,
        };
        Ok((vector, span))
    }

    /// The `LOOKBACK_DAYS` observations covering `anchor - 30 ..= anchor - 1`.
    pub fn window<'a>(
        &self,
        series: &'a PriceSeries,
        anchor: NaiveDate,
    ) -> Result<&'a [PriceObservation], FeatureError> {
        let history = series.before(anchor);
        if history.len() < LOOKBACK_DAYS {
            return Err(FeatureError::InsufficientHistory {
                anchor,
                available: history.len(),
                required: LOOKBACK_DAYS,
            });
        }
        let window = &history[history.len() - LOOKBACK_DAYS..];

        // Walk back from d-1. Dates are strictly increasing, so the first
        // mismatch means the expected day has no observation at all.
        for (offset, obs) in window.iter().rev().enumerate() {
            let expected = anchor - chrono::Duration::days(offset as i64 + 1);
            if obs.date != expected {
                return Err(FeatureError::NonContiguousSeries {
                    anchor,
                    missing: expected,
                });
            }
        }
        Ok(window)
    }
}
