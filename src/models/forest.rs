//! Tree-ensemble regressor evaluated natively.
//!
//! Trees are stored in flattened node-array form: node `i` splits on
//! `feature[i]` at `threshold[i]`, going to `children_left[i]` when the value
//! is `<= threshold` and to `children_right[i]` otherwise. A node whose left
//! child is `-1` is a leaf holding `value[i]`. The ensemble prediction is the
//! mean of the tree predictions.

use crate::models::Regressor;
use anyhow::{bail, Result};
use serde::Deserialize;

const LEAF: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
struct RawTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawForest {
    #[serde(default = "default_name")]
    name: String,
    n_features: usize,
    trees: Vec<RawTree>,
}

fn default_name() -> String {
    "random_forest".to_string()
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_raw(raw: RawTree, n_features: usize) -> Result<Self, String> {
        let len = raw.children_left.len();
        if len == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            raw.children_right.len(),
            raw.feature.len(),
            raw.threshold.len(),
            raw.value.len(),
        ]
        .iter()
        .any(|&l| l != len)
        {
            return Err("node arrays have different lengths".to_string());
        }

        let mut nodes = Vec::with_capacity(len);
        for i in 0..len {
            let (left, right) = (raw.children_left[i], raw.children_right[i]);
            if left == LEAF {
                if !raw.value[i].is_finite() {
                    return Err(format!("leaf {i} has a non-finite value"));
                }
                nodes.push(Node::Leaf(raw.value[i]));
                continue;
            }

            // children always come after their parent, which rules out cycles
            let child = |c: i64| -> Result<usize, String> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < len)
                    .ok_or_else(|| format!("node {i} has invalid child index {c}"))
            };
            let feature = usize::try_from(raw.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| format!("node {i} splits on invalid feature {}", raw.feature[i]))?;

            nodes.push(Node::Split {
                feature,
                threshold: raw.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn predict(&self, features: &[f32]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if f64::from(features[feature]) <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// Mean-of-trees regressor, e.g. an exported random forest
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    name: String,
    n_features: usize,
    trees: Vec<Tree>,
}

impl ForestRegressor {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let raw: RawForest = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if raw.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if raw.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }

        let trees = raw
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                Tree::from_raw(tree, raw.n_features).map_err(|e| format!("tree {i}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: raw.name,
            n_features: raw.n_features,
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for ForestRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.n_features {
            bail!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            );
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOREST: &str = r#"{
        "name": "rf",
        "n_features": 2,
        "trees": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [0, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [0.0, 100.0, 200.0]
            },
            {
                "children_left": [-1],
                "children_right": [-1],
                "feature": [-2],
                "threshold": [-2.0],
                "value": [300.0]
            }
        ]
    }"#;

    #[test]
    fn test_predict_mean_of_trees() {
        let forest = ForestRegressor::from_json(FOREST).unwrap();
        assert_eq!(forest.name(), "rf");
        assert_eq!(forest.tree_count(), 2);

        assert_eq!(forest.predict(&[0.5, 9.0]).unwrap(), 200.0);
        assert_eq!(forest.predict(&[0.6, 9.0]).unwrap(), 250.0);
    }

    #[test]
    fn test_width_mismatch_is_error() {
        let forest = ForestRegressor::from_json(FOREST).unwrap();
        assert!(forest.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_rejects_bad_structure() {
        let backwards = FOREST.replace("[1, -1, -1]", "[0, -1, -1]");
        let err = ForestRegressor::from_json(&backwards).unwrap_err();
        assert!(err.contains("invalid child index"), "{err}");

        let bad_feature = FOREST.replace("[0, -2, -2]", "[5, -2, -2]");
        let err = ForestRegressor::from_json(&bad_feature).unwrap_err();
        assert!(err.contains("invalid feature"), "{err}");

        let short = FOREST.replace("[0.0, 100.0, 200.0]", "[0.0, 100.0]");
        assert!(ForestRegressor::from_json(&short).is_err());

        assert!(ForestRegressor::from_json(r#"{"n_features": 2, "trees": []}"#).is_err());
    }
}
