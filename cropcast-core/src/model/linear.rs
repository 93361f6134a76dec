//! Linear regression over the feature vector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ModelError, Regressor};
use crate::features::{Feature, FeatureVector};

/// `price = intercept + Σ coefficient[f] * x[f]`.
///
/// Features without a coefficient contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    #[serde(default)]
    pub coefficients: BTreeMap<Feature, f64>,
}

impl LinearModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.intercept.is_finite() {
            return Err(ModelError::NonFinite("intercept".into()));
        }
        for (feature, weight) in &self.coefficients {
            if !weight.is_finite() {
                return Err(ModelError::NonFinite(format!("coefficient {feature}")));
            }
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn kind(&self) -> &str {
        "linear"
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .fold(self.intercept, |acc, (f, w)| acc + w * features.get(*f))
    }
}
