//! Property tests for forecast invariants.
//!
//! Uses proptest to verify:
//! 1. Trend label always agrees with the sign of the change
//! 2. Rollouts have exactly N consecutive days and grow the working series by one per step
//! 3. Features never depend on prices dated on or after the anchor
//! 4. Horizon accepts exactly 1..=30

use chrono::{Duration, NaiveDate};
use cropcast_core::domain::{PriceObservation, PriceSeries};
use cropcast_core::engine::{rollout, Horizon};
use cropcast_core::features::{FeatureBuilder, FeatureVector, LOOKBACK_DAYS};
use cropcast_core::model::FnRegressor;
use cropcast_core::registry::ModelEntry;
use cropcast_core::{summarize, CropStateKey, TrendLabel};
use proptest::prelude::*;
use std::sync::Arc;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (100.0..5000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), min..max)
}

fn to_series(prices: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    PriceSeries::new(
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PriceObservation::new(start + Duration::days(i as i64), p))
            .collect(),
    )
    .unwrap()
}

fn damped_model() -> ModelEntry {
    ModelEntry::new(
        CropStateKey::new("Wheat", "Madhya Pradesh"),
        Arc::new(FnRegressor::new("damped", |v: &FeatureVector| {
            0.5 * v.lag_1 + 0.3 * v.ma_7 + 0.2 * v.lag_30
        })),
    )
}

// ── 1. Trend sign ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn trend_label_matches_sign(start in arb_price(), end in arb_price()) {
        let summary = summarize(start, end);
        let pct = summary.percent_change.unwrap();
        match summary.label {
            TrendLabel::Upward => prop_assert!(pct > 0.0),
            TrendLabel::Downward => prop_assert!(pct < 0.0),
            TrendLabel::Stable => prop_assert_eq!(pct, 0.0),
        }

        // A reported move never points the wrong way.
        if pct > 0.0 {
            prop_assert!(end > start);
        } else if pct < 0.0 {
            prop_assert!(end < start);
        }
        if end == start {
            prop_assert_eq!(summary.label, TrendLabel::Stable);
        }
    }
}

// ── 2. Rollout shape ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn rollout_has_n_consecutive_days(prices in arb_prices(30, 90), days in 1u32..=30) {
        let history = to_series(&prices);
        let steps = rollout(&damped_model(), &history, Horizon::new(days).unwrap()).unwrap();
        let last = history.last_date().unwrap();

        prop_assert_eq!(steps.len(), days as usize);
        for (i, step) in steps.iter().enumerate() {
            prop_assert_eq!(step.step as usize, i + 1);
            prop_assert_eq!(step.anchor, last + Duration::days(i as i64 + 1));
            prop_assert_eq!(step.working_len, LOOKBACK_DAYS + i + 1);
            prop_assert!(step.window_end < step.anchor);
            prop_assert!(step.raw_prediction.is_finite());
        }
    }
}

// ── 3. No look-ahead ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn later_prices_never_change_features(
        prices in arb_prices(31, 80),
        replacement in arb_price(),
        offset in 0usize..50,
    ) {
        let series = to_series(&prices);
        let anchor_idx = LOOKBACK_DAYS + offset % (prices.len() - LOOKBACK_DAYS);
        let anchor = series.as_slice()[anchor_idx].date;

        let mut altered = prices.clone();
        for p in altered.iter_mut().skip(anchor_idx) {
            *p = replacement;
        }

        let builder = FeatureBuilder::new();
        let a = builder.build(&series, anchor).unwrap();
        let b = builder.build(&to_series(&altered), anchor).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ── 4. Horizon range ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn horizon_accepts_only_one_to_thirty(days in 0u32..100) {
        let ok = Horizon::new(days).is_ok();
        prop_assert_eq!(ok, (1..=30).contains(&days));
        prop_assert_eq!(days.to_string().parse::<Horizon>().is_ok(), ok);
    }
}
