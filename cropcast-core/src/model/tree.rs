//! Decision-tree ensembles (gradient boosting or random forest).
//!
//! Each tree is a flat node array rooted at index 0. A split sends the
//! vector left when `x[feature] <= threshold`. Child indices must point
//! forward (`child > parent`), which makes every traversal terminate.
//!
//! Ensemble output:
//! - `sum` (boosting): `base_score + learning_rate * Σ leaf`
//! - `mean` (forest):  `base_score + learning_rate * mean(leaf)`

use serde::{Deserialize, Serialize};

use super::{ModelError, Regressor};
use crate::features::{Feature, FeatureVector};

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: Feature,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn evaluate(&self, features: &FeatureVector) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Structural checks. `predict` relies on these having passed.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.base_score.is_finite() {
            return Err(ModelError::NonFinite("base_score".into()));
        }
        if !self.learning_rate.is_finite() {
            return Err(ModelError::NonFinite("learning_rate".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::NoTrees);
        }

        for (t_idx, tree) in self.trees.iter().enumerate() {
            let len = tree.nodes.len();
            if len == 0 {
                return Err(ModelError::EmptyTree { tree: t_idx });
            }
            for (n_idx, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(ModelError::NonFinite(format!(
                                "leaf value in tree {t_idx} node {n_idx}"
                            )));
                        }
                    }
                    TreeNode::Split {
                        threshold,
                        left,
                        right,
                        ..
                    } => {
                        if !threshold.is_finite() {
                            return Err(ModelError::NonFinite(format!(
                                "threshold in tree {t_idx} node {n_idx}"
                            )));
                        }
                        for &child in [left, right] {
                            if child <= n_idx || child >= len {
                                return Err(ModelError::InvalidChild {
                                    tree: t_idx,
                                    node: n_idx,
                                    child,
                                    len,
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn kind(&self) -> &str {
        "tree_ensemble"
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        let combined = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean => total / self.trees.len() as f64,
        };
        self.base_score + self.learning_rate * combined
    }
}
