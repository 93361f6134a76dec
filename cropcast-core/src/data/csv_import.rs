//! CSV import of the agricultural market price dataset.
//!
//! Expected columns (others are ignored):
//! `Commodity`, `STATE`, `Price Date` (day-first), `Modal_Price`.
//!
//! Rows whose date or price cannot be parsed are dropped and counted.
//! Each (crop, state) group is resampled to a contiguous daily series.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use super::daily::resample_daily;
use super::memory::InMemoryHistoryStore;
use crate::domain::{CropStateKey, PriceSeries, SeriesError};

const REQUIRED_COLUMNS: [&str; 4] = ["Commodity", "STATE", "Price Date", "Modal_Price"];

/// Accepted date layouts, day-first formats tried before ISO.
const DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("failed to open price file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("price file is missing required column '{0}'")]
    MissingColumn(String),

    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

/// Counters reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub pairs: usize,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(rename = "Commodity")]
    commodity: String,
    #[serde(rename = "STATE")]
    state: String,
    #[serde(rename = "Price Date")]
    price_date: String,
    #[serde(rename = "Modal_Price")]
    modal_price: String,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Load a price CSV from disk.
pub fn load_price_csv(
    path: impl AsRef<Path>,
) -> Result<(InMemoryHistoryStore, ImportSummary), CsvImportError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CsvImportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let (store, summary) = read_price_csv(file)?;
    info!(
        path = %path.display(),
        pairs = summary.pairs,
        rows = summary.rows_read,
        skipped = summary.rows_skipped,
        "loaded price history"
    );
    Ok((store, summary))
}

/// Read a price CSV from any reader into a history store.
pub fn read_price_csv<R: Read>(
    reader: R,
) -> Result<(InMemoryHistoryStore, ImportSummary), CsvImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CsvImportError::MissingColumn(column.to_string()));
        }
    }

    let mut summary = ImportSummary::default();
    let mut grouped: BTreeMap<CropStateKey, Vec<(NaiveDate, f64)>> = BTreeMap::new();

    for record in rdr.deserialize::<RawQuote>() {
        summary.rows_read += 1;
        let quote = match record {
            Ok(q) => q,
            Err(_) => {
                summary.rows_skipped += 1;
                continue;
            }
        };
        let (Some(date), Some(price)) = (
            parse_date(&quote.price_date),
            parse_price(&quote.modal_price),
        ) else {
            summary.rows_skipped += 1;
            continue;
        };
        if quote.commodity.is_empty() || quote.state.is_empty() {
            summary.rows_skipped += 1;
            continue;
        }
        grouped
            .entry(CropStateKey::new(quote.commodity, quote.state))
            .or_default()
            .push((date, price));
    }

    if summary.rows_skipped > 0 {
        warn!(
            skipped = summary.rows_skipped,
            "dropped price rows with unparseable fields"
        );
    }

    let mut store = InMemoryHistoryStore::new();
    for (key, quotes) in grouped {
        let daily = resample_daily(&quotes);
        if daily.is_empty() {
            continue;
        }
        store.insert(key, PriceSeries::new(daily)?);
    }
    summary.pairs = store.len();

    Ok((store, summary))
}
