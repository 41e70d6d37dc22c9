//! Decision tree ensembles
//!
//! Gradient-boosted and random-forest regressors stored as JSON. Each tree is
//! a flat node array rooted at index 0:
//!
//! ```json
//! {
//!   "aggregation": "sum",
//!   "comparison": "<",
//!   "base_score": 120.0,
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 2, "threshold": 8.5, "left": 1, "right": 2 },
//!         { "value": -40.0 },
//!         { "value": 35.0 }
//!     ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Regressor;
use crate::features::FeatureVector;
use crate::{ParkingError, Result};

/// How per-tree outputs combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Boosted trees: base score plus the sum of leaves
    #[default]
    Sum,
    /// Random forest: base score plus the mean of leaves
    Mean,
}

/// Split test sending a sample to the left child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitComparison {
    /// `x < threshold` (XGBoost)
    #[default]
    #[serde(rename = "<")]
    Less,
    /// `x <= threshold` (scikit-learn)
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl SplitComparison {
    #[inline]
    fn goes_left(self, value: f32, threshold: f32) -> bool {
        match self {
            SplitComparison::Less => value < threshold,
            SplitComparison::LessOrEqual => value <= threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk from the root to a leaf
    fn leaf_value(&self, x: &[f32], comparison: SplitComparison) -> Result<f32> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.nodes.len() {
            match &self.nodes[idx] {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = x.get(*feature).copied().ok_or_else(|| {
                        ParkingError::Model(format!("missing input feature {}", feature))
                    })?;
                    idx = if comparison.goes_left(value, *threshold) {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        Err(ParkingError::Model("tree contains a cycle".to_string()))
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ParkingError::Model(format!("tree {} has no nodes", index)));
        }
        for node in &self.nodes {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FeatureVector::DIM {
                    return Err(ParkingError::Model(format!(
                        "tree {} splits on feature {} but inputs have {}",
                        index,
                        feature,
                        FeatureVector::DIM
                    )));
                }
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(ParkingError::Model(format!(
                        "tree {} has a child index out of range",
                        index
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Tree ensemble regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub comparison: SplitComparison,
    #[serde(default)]
    pub base_score: f32,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Load and validate an ensemble from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ensemble: TreeEnsemble = serde_json::from_str(&content)?;
        ensemble.validate()?;
        Ok(ensemble)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ParkingError::Model("ensemble has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }

    pub fn predict_raw(&self, x: &[f32]) -> Result<f32> {
        let mut total = 0.0f32;
        for tree in &self.trees {
            total += tree.leaf_value(x, self.comparison)?;
        }
        let combined = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean => total / self.trees.len() as f32,
        };
        Ok(self.base_score + combined)
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f32> {
        self.predict_raw(&features.to_vec())
    }

    fn describe(&self) -> String {
        let kind = match self.aggregation {
            Aggregation::Sum => "boosted",
            Aggregation::Mean => "forest",
        };
        format!("tree ensemble ({}, {} trees)", kind, self.trees.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f32, low: f32, high: f32) -> Tree {
        Tree {
            nodes: vec![
                Node::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { value: low },
                Node::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_boosted_sum() {
        let model = TreeEnsemble {
            aggregation: Aggregation::Sum,
            comparison: SplitComparison::Less,
            base_score: 100.0,
            trees: vec![stump(2, 8.0, -30.0, 20.0), stump(4, 0.5, 15.0, -5.0)],
        };

        // hour 12, workday
        let v = FeatureVector::from([3, 15, 12, 1, 1]);
        assert_eq!(model.predict(&v).unwrap(), 115.0);

        // hour 0, holiday
        let v = FeatureVector::from([1, 1, 0, 0, 0]);
        assert_eq!(model.predict(&v).unwrap(), 85.0);
    }

    #[test]
    fn test_forest_mean() {
        let model = TreeEnsemble {
            aggregation: Aggregation::Mean,
            comparison: SplitComparison::LessOrEqual,
            base_score: 0.0,
            trees: vec![stump(0, 6.0, 10.0, 20.0), stump(0, 3.0, 30.0, 50.0)],
        };
        let v = FeatureVector::from([3, 15, 12, 1, 1]);
        // month 3 <= 6 -> 10, month 3 <= 3 -> 30
        assert_eq!(model.predict(&v).unwrap(), 20.0);
    }

    #[test]
    fn test_comparison_at_threshold() {
        assert!(!SplitComparison::Less.goes_left(3.0, 3.0));
        assert!(SplitComparison::LessOrEqual.goes_left(3.0, 3.0));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "base_score": 120.0,
            "trees": [
                { "nodes": [
                    { "feature": 2, "threshold": 8.5, "left": 1, "right": 2 },
                    { "value": -40.0 },
                    { "value": 35.0 }
                ] }
            ]
        }"#;
        let model: TreeEnsemble = serde_json::from_str(json).unwrap();
        model.validate().unwrap();
        assert_eq!(model.aggregation, Aggregation::Sum);
        assert_eq!(model.comparison, SplitComparison::Less);

        let v = FeatureVector::from([1, 1, 0, 0, 0]);
        assert_eq!(model.predict(&v).unwrap(), 80.0);
    }

    #[test]
    fn test_validate_rejects_bad_trees() {
        let no_trees = TreeEnsemble {
            aggregation: Aggregation::Sum,
            comparison: SplitComparison::Less,
            base_score: 0.0,
            trees: vec![],
        };
        assert!(no_trees.validate().is_err());

        let bad_feature = TreeEnsemble {
            trees: vec![stump(FeatureVector::DIM, 1.0, 0.0, 1.0)],
            ..no_trees.clone()
        };
        assert!(bad_feature.validate().is_err());

        let bad_child = TreeEnsemble {
            trees: vec![Tree {
                nodes: vec![Node::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 1,
                    right: 7,
                }],
            }],
            ..no_trees
        };
        assert!(bad_child.validate().is_err());
    }

    #[test]
    fn test_cycle_is_an_error() {
        let model = TreeEnsemble {
            aggregation: Aggregation::Sum,
            comparison: SplitComparison::Less,
            base_score: 0.0,
            trees: vec![Tree {
                nodes: vec![
                    Node::Split {
                        feature: 0,
                        threshold: 100.0,
                        left: 1,
                        right: 1,
                    },
                    Node::Split {
                        feature: 0,
                        threshold: 100.0,
                        left: 0,
                        right: 0,
                    },
                ],
            }],
        };
        model.validate().unwrap();
        let v = FeatureVector::from([1, 1, 0, 0, 0]);
        assert!(model.predict(&v).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let model = TreeEnsemble {
            aggregation: Aggregation::Sum,
            comparison: SplitComparison::Less,
            base_score: 50.0,
            trees: vec![stump(1, 10.0, 1.0, 2.0)],
        };
        let path = std::env::temp_dir().join(format!(
            "parking_forest_test_{}.json",
            std::process::id()
        ));
        model.save(&path).unwrap();
        let loaded = TreeEnsemble::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, model);
    }
}
