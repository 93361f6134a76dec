//! Trend summary of a forecast: percent change from first to last price and
//! a qualitative label.
//!
//! The percent change is rounded to 2 decimals and classified by a strict
//! sign test on that same rounded value, so a reported `0.0` is always
//! `Stable` and any non-zero value carries its sign's label. There is no
//! dead zone beyond the rounding itself: +0.005 % is `Upward`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendLabel {
    Upward,
    Downward,
    Stable,
}

impl TrendLabel {
    /// Label for a signed change. NaN counts as no change.
    pub fn from_sign(change: f64) -> Self {
        if change > 0.0 {
            TrendLabel::Upward
        } else if change < 0.0 {
            TrendLabel::Downward
        } else {
            TrendLabel::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendLabel::Upward => "Upward",
            TrendLabel::Downward => "Downward",
            TrendLabel::Stable => "Stable",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            TrendLabel::Upward => "📈",
            TrendLabel::Downward => "📉",
            TrendLabel::Stable => "➝",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Percent change rounded to 2 decimals. `None` when the start price is
    /// zero.
    pub percent_change: Option<f64>,
    pub label: TrendLabel,
}

impl TrendSummary {
    pub fn emoji(&self) -> &'static str {
        self.label.emoji()
    }
}

/// Summarize the move from `start` to `end`.
///
/// With `start == 0` the percentage is undefined; the label then follows the
/// sign of `end - start`.
pub fn summarize(start: f64, end: f64) -> TrendSummary {
    if start == 0.0 {
        return TrendSummary {
            percent_change: None,
            label: TrendLabel::from_sign(end - start),
        };
    }

    let percent = round2((end - start) / start * 100.0);
    TrendSummary {
        percent_change: Some(percent),
        label: TrendLabel::from_sign(percent),
    }
}
