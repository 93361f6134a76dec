//! In-memory history store, built once and shared read-only.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::provider::{HistoryError, PriceHistoryStore};
use crate::domain::{CropStateKey, PriceSeries};

#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    series: BTreeMap<CropStateKey, Arc<PriceSeries>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the series for a pair.
    pub fn insert(&mut self, key: CropStateKey, series: PriceSeries) {
        self.series.insert(key, Arc::new(series));
    }

    pub fn keys(&self) -> impl Iterator<Item = &CropStateKey> {
        self.series.keys()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<(CropStateKey, PriceSeries)> for InMemoryHistoryStore {
    fn from_iter<I: IntoIterator<Item = (CropStateKey, PriceSeries)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, series) in iter {
            store.insert(key, series);
        }
        store
    }
}

impl PriceHistoryStore for InMemoryHistoryStore {
    fn series(&self, key: &CropStateKey) -> Result<Arc<PriceSeries>, HistoryError> {
        self.series
            .get(key)
            .cloned()
            .ok_or_else(|| HistoryError::NoHistory {
                crop: key.crop.clone(),
                state: key.state.clone(),
            })
    }

    fn crops(&self) -> Vec<String> {
        let crops: BTreeSet<&str> = self.series.keys().map(|k| k.crop.as_str()).collect();
        crops.into_iter().map(String::from).collect()
    }

    fn states(&self, crop: Option<&str>) -> Vec<String> {
        let states: BTreeSet<&str> = self
            .series
            .keys()
            .filter(|k| crop.map_or(true, |c| k.crop == c))
            .map(|k| k.state.as_str())
            .collect();
        states.into_iter().map(String::from).collect()
    }
}
