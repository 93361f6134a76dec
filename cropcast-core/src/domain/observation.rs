//! Dated price points: recorded history and engine output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One recorded market price (₹ per quintal) for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// One day of a forecast. `price` is the reported (2-decimal) value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Round a price to 2 decimals for reporting. Tiny negatives come out as
/// `0.0`, never `-0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
