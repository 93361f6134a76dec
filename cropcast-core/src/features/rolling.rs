//! Trailing-window statistics over price slices.
//!
//! Windows are taken from the end of the slice: `mean(prices, 7)` is the mean
//! of the last 7 values. Callers pass the history ending the day before the
//! anchor.

use crate::domain::PriceObservation;

/// Mean of the last `window` prices. `None` if fewer are available.
pub fn trailing_mean(history: &[PriceObservation], window: usize) -> Option<f64> {
    let tail = trailing(history, window)?;
    let sum: f64 = tail.iter().map(|o| o.price).sum();
    Some(sum / window as f64)
}

/// Sample standard deviation (divide by n-1) of the last `window` prices.
///
/// Defined as 0 for a one-element window. `None` if fewer are available.
pub fn trailing_std(history: &[PriceObservation], window: usize) -> Option<f64> {
    let tail = trailing(history, window)?;
    if window == 1 {
        return Some(0.0);
    }
    let mean = tail.iter().map(|o| o.price).sum::<f64>() / window as f64;
    let variance = tail
        .iter()
        .map(|o| {
            let diff = o.price - mean;
            diff * diff
        })
        .sum::<f64>()
        / (window - 1) as f64;
    Some(variance.sqrt())
}

fn trailing(history: &[PriceObservation], window: usize) -> Option<&[PriceObservation]> {
    if window == 0 || history.len() < window {
        return None;
    }
    Some(&history[history.len() - window..])
}
