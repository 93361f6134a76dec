//! PriceSeries: chronologically ordered price history for one crop–state pair.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::observation::PriceObservation;

/// Structural problems with a price series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("observation dates must be strictly increasing: {previous} is followed by {next}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },

    #[error("non-finite price {price} on {date}")]
    NonFinitePrice { date: NaiveDate, price: f64 },
}

/// Ordered, duplicate-free sequence of daily observations.
///
/// Dates are strictly increasing. Gaps between dates are allowed here; the
/// CSV loader resamples to a contiguous daily series, and the feature builder
/// reports any gap it actually needs as `NonContiguousSeries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    /// Build a series, validating order and price finiteness.
    pub fn new(observations: Vec<PriceObservation>) -> Result<Self, SeriesError> {
        for obs in &observations {
            Self::check_price(obs)?;
        }
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { observations })
    }

    /// Append an observation dated after the current last one.
    pub fn push(&mut self, obs: PriceObservation) -> Result<(), SeriesError> {
        Self::check_price(&obs)?;
        if let Some(last) = self.observations.last() {
            if obs.date <= last.date {
                return Err(SeriesError::OutOfOrder {
                    previous: last.date,
                    next: obs.date,
                });
            }
        }
        self.observations.push(obs);
        Ok(())
    }

    fn check_price(obs: &PriceObservation) -> Result<(), SeriesError> {
        if obs.price.is_finite() {
            Ok(())
        } else {
            Err(SeriesError::NonFinitePrice {
                date: obs.date,
                price: obs.price,
            })
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn as_slice(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// All observations dated strictly before `anchor`.
    ///
    /// This is the only view the feature builder gets, so nothing on or after
    /// the anchor can leak into its features.
    pub fn before(&self, anchor: NaiveDate) -> &[PriceObservation] {
        let end = self.observations.partition_point(|o| o.date < anchor);
        &self.observations[..end]
    }

    /// A new series holding at most the last `n` observations.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.observations.len().saturating_sub(n);
        Self {
            observations: self.observations[start..].to_vec(),
        }
    }
}
