//! Regression models consumed by the forecast engine.
//!
//! Training happens elsewhere; this module only evaluates already-trained
//! models. Models are persisted as JSON, one file per crop–state pair:
//!
//! ```json
//! { "crop": "Potato", "state": "Punjab",
//!   "model": { "kind": "linear", "intercept": 12.5,
//!              "coefficients": { "lag_1": 0.82, "ma_7": 0.15 } } }
//! ```

pub mod linear;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::CropStateKey;
use crate::features::FeatureVector;

pub use linear::LinearModel;
pub use tree::{Aggregation, Tree, TreeEnsemble, TreeNode};

/// A trained regressor: feature vector in, price out.
///
/// Implementations must be pure: the same vector always yields the same price.
pub trait Regressor: Send + Sync + fmt::Debug {
    /// Short model family name (e.g., "linear", "tree_ensemble").
    fn kind(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Errors from decoding or validating a persisted model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid model JSON: {0}")]
    Decode(String),

    #[error("non-finite parameter: {0}")]
    NonFinite(String),

    #[error("tree {tree} is empty")]
    EmptyTree { tree: usize },

    #[error("tree ensemble has no trees")]
    NoTrees,

    #[error("tree {tree} node {node} has invalid child {child} (must be in {node}+1..{len})")]
    InvalidChild {
        tree: usize,
        node: usize,
        child: usize,
        len: usize,
    },
}

/// Persisted model parameters, tagged by family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelSpec {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelSpec::Linear(m) => m.validate(),
            ModelSpec::TreeEnsemble(m) => m.validate(),
        }
    }

    /// Validate and wrap as a shareable regressor.
    pub fn into_regressor(self) -> Result<Arc<dyn Regressor>, ModelError> {
        self.validate()?;
        Ok(match self {
            ModelSpec::Linear(m) => Arc::new(m),
            ModelSpec::TreeEnsemble(m) => Arc::new(m),
        })
    }
}

/// On-disk model document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub crop: String,
    pub state: String,
    pub model: ModelSpec,
}

impl ModelFile {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::Decode(e.to_string()))
    }

    /// Decode raw file bytes. Invalid UTF-8 is an error, not replaced.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::Decode(e.to_string()))
    }

    pub fn key(&self) -> CropStateKey {
        CropStateKey::new(self.crop.clone(), self.state.clone())
    }
}

/// Wraps a closure as a regressor. Handy for fixtures and custom models.
pub struct FnRegressor<F> {
    name: String,
    f: F,
}

impl<F> FnRegressor<F>
where
    F: Fn(&FeatureVector) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnRegressor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRegressor").field("name", &self.name).finish()
    }
}

impl<F> Regressor for FnRegressor<F>
where
    F: Fn(&FeatureVector) -> f64 + Send + Sync,
{
    fn kind(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        (self.f)(features)
    }
}
