//! Daily resampling of raw market quotes.
//!
//! Raw data has several quotes per day (one per market) and missing days
//! (holidays, no arrivals). The stored series has exactly one observation per
//! calendar day between the first and last quote:
//! - same-day quotes are averaged
//! - missing days are filled by linear interpolation in time

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::PriceObservation;

/// Collapse raw `(date, price)` quotes into a contiguous daily series.
///
/// Non-finite prices are ignored. Returns an empty vector if nothing usable
/// remains.
pub fn resample_daily(quotes: &[(NaiveDate, f64)]) -> Vec<PriceObservation> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for &(date, price) in quotes {
        if !price.is_finite() {
            continue;
        }
        let slot = by_day.entry(date).or_insert((0.0, 0));
        slot.0 += price;
        slot.1 += 1;
    }

    let known: Vec<(NaiveDate, f64)> = by_day
        .into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect();

    let Some(&(first_date, first_price)) = known.first() else {
        return Vec::new();
    };

    let mut out = vec![PriceObservation::new(first_date, first_price)];
    for pair in known.windows(2) {
        let (d0, p0) = pair[0];
        let (d1, p1) = pair[1];
        let span = (d1 - d0).num_days();
        for step in 1..span {
            let t = step as f64 / span as f64;
            let date = d0 + chrono::Duration::days(step);
            out.push(PriceObservation::new(date, p0 + (p1 - p0) * t));
        }
        out.push(PriceObservation::new(d1, p1));
    }
    out
}
