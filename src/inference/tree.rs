//! Tree ensembles exported from scikit-learn
//!
//! Each tree is stored in scikit-learn's flat `tree_` form: parallel arrays
//! indexed by node id, root at 0, leaves marked with child id `-1`.

use serde::{Deserialize, Serialize};

use super::features::{check_feature_names, FeatureRow, FEATURE_COUNT};
use super::regressor::Regressor;
use super::{InferenceError, InferenceResult};

const TREE_LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// One regression value per node
    pub value: Vec<f64>,
}

impl Tree {
    pub fn num_nodes(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self) -> Result<(), String> {
        let n = self.num_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        for (name, len) in [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ] {
            if len != n {
                return Err(format!("{} has {} entries, expected {}", name, len, n));
            }
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF && right == TREE_LEAF {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            // Children always follow their parent in scikit-learn's depth-first
            // layout, which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_COUNT as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf. Goes left when `x[feature] <= threshold`.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        while self.children_left[idx] != TREE_LEAF {
            let fvalue = features[self.feature[idx] as usize];
            // scikit-learn compares in float32
            let fvalue = f64::from(fvalue as f32);

            idx = if fvalue <= self.threshold[idx] {
                self.children_left[idx] as usize
            } else {
                self.children_right[idx] as usize
            };
        }

        self.value[idx]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of tree outputs (decision tree, random forest, extra trees)
    Mean,
    /// `base_score + learning_rate * Σ outputs` (gradient boosting)
    Sum,
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> InferenceResult<()> {
        if let Some(names) = &self.feature_names {
            check_feature_names(names)
                .map_err(|e| InferenceError::InvalidArtifact(format!("tree ensemble: {}", e)))?;
        }
        if self.trees.is_empty() {
            return Err(InferenceError::InvalidArtifact(
                "tree ensemble has no trees".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|e| InferenceError::InvalidArtifact(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn kind(&self) -> &'static str {
        match self.aggregation {
            Aggregation::Mean => "tree_ensemble/mean",
            Aggregation::Sum => "tree_ensemble/sum",
        }
    }

    fn predict(&self, row: &FeatureRow) -> InferenceResult<f64> {
        let total: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_row(row.as_slice()))
            .sum();

        Ok(match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + self.learning_rate * total,
        })
    }
}
