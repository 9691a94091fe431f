//! Decision-tree ensembles stored as flat node arrays.
//!
//! Node `i` is a leaf when `children_left[i] == -1`. Otherwise the walk goes
//! left when `row[feature[i]] <= threshold[i]` and right otherwise. Children
//! always have a larger index than their parent, so every walk terminates.

use serde::{Deserialize, Serialize};

use eysh_core::error::PredictionError;
use eysh_core::traits::Predictor;

use crate::error::ArtifactError;

/// Marker for "no child" in the node arrays.
pub const LEAF: i64 = -1;

/// One exported tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node output: a class distribution for classifiers, a single value
    /// for regressors.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Check array shapes and child links. `width` is the expected length of
    /// every `value` entry.
    pub fn validate(
        &self,
        name: &str,
        width: usize,
        n_features: Option<usize>,
    ) -> Result<(), ArtifactError> {
        let n = self.node_count();
        if n == 0 {
            return Err(ArtifactError::invalid(name, "tree has no nodes"));
        }
        let lengths = [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(ArtifactError::invalid(
                name,
                format!("tree node arrays disagree in length (expected {n})"),
            ));
        }

        for i in 0..n {
            if self.value[i].len() != width {
                return Err(ArtifactError::invalid(
                    name,
                    format!(
                        "node {i} has {} values, expected {width}",
                        self.value[i].len()
                    ),
                ));
            }

            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF && right == LEAF {
                continue;
            }
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(ArtifactError::invalid(
                        name,
                        format!("node {i} has invalid child {child}"),
                    ));
                }
            }

            let feature = self.feature[i];
            let in_range = feature >= 0 && n_features.map_or(true, |nf| (feature as usize) < nf);
            if !in_range {
                return Err(ArtifactError::invalid(
                    name,
                    format!("node {i} splits on unknown feature {feature}"),
                ));
            }
            if !self.threshold[i].is_finite() {
                return Err(ArtifactError::invalid(
                    name,
                    format!("node {i} has a non-finite threshold"),
                ));
            }
        }
        Ok(())
    }

    /// Leaf output for a row. Assumes [`validate`](Self::validate) passed.
    pub fn leaf(&self, row: &[f64]) -> Result<&[f64], PredictionError> {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return Ok(&self.value[node]);
            }
            let feature = self.feature[node] as usize;
            let x = row.get(feature).ok_or(PredictionError::FeatureMismatch {
                expected: feature + 1,
                actual: row.len(),
            })?;
            node = if *x <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

/// How per-tree outputs combine into one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Aggregation {
    /// Random-forest classifier: average the normalized leaf distributions
    /// and return the label of the most probable class.
    Vote { classes: Vec<f64> },
    /// Gradient-boosted regressor: `init + learning_rate × Σ leaf value`.
    Boosted { init: f64, learning_rate: f64 },
}

impl Aggregation {
    /// Expected length of each leaf value.
    pub fn value_width(&self) -> usize {
        match self {
            Aggregation::Vote { classes } => classes.len(),
            Aggregation::Boosted { .. } => 1,
        }
    }
}

/// A validated tree ensemble.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<DecisionTree>,
    aggregation: Aggregation,
    n_features: Option<usize>,
}

impl TreeEnsemble {
    pub fn new(
        name: &str,
        trees: Vec<DecisionTree>,
        aggregation: Aggregation,
        n_features: Option<usize>,
    ) -> Result<Self, ArtifactError> {
        if trees.is_empty() {
            return Err(ArtifactError::invalid(name, "ensemble has no trees"));
        }
        match &aggregation {
            Aggregation::Vote { classes } if classes.is_empty() => {
                return Err(ArtifactError::invalid(name, "classifier has no classes"));
            }
            Aggregation::Boosted {
                init,
                learning_rate,
            } if !init.is_finite() || !learning_rate.is_finite() => {
                return Err(ArtifactError::invalid(name, "non-finite boosting parameters"));
            }
            _ => {}
        }

        let width = aggregation.value_width();
        for tree in &trees {
            tree.validate(name, width, n_features)?;
        }

        Ok(Self {
            trees,
            aggregation,
            n_features,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn vote(&self, row: &[f64], classes: &[f64]) -> Result<f64, PredictionError> {
        let mut proba = vec![0.0; classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(row)?;
            let total: f64 = leaf.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for (p, v) in proba.iter_mut().zip(leaf) {
                *p += v / total;
            }
        }

        // first maximum wins
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(classes[best])
    }

    fn boost(&self, row: &[f64], init: f64, learning_rate: f64) -> Result<f64, PredictionError> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.leaf(row)?[0];
        }
        Ok(init + learning_rate * sum)
    }
}

impl Predictor for TreeEnsemble {
    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<f64, PredictionError> {
        match &self.aggregation {
            Aggregation::Vote { classes } => self.vote(row, classes),
            Aggregation::Boosted {
                init,
                learning_rate,
            } => self.boost(row, *init, *learning_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x0 <= 0.5 → first leaf, else second leaf.
    fn stump(left: Vec<f64>, right: Vec<f64>) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![0.0; left.len()], left, right],
        }
    }

    #[test]
    fn walks_to_leaf() {
        let tree = stump(vec![1.0], vec![2.0]);
        tree.validate("t", 1, Some(1)).unwrap();
        assert_eq!(tree.leaf(&[0.5]).unwrap(), &[1.0]);
        assert_eq!(tree.leaf(&[0.7]).unwrap(), &[2.0]);
    }

    #[test]
    fn vote_averages_distributions() {
        let ensemble = TreeEnsemble::new(
            "level",
            vec![
                stump(vec![8.0, 2.0, 0.0], vec![0.0, 0.0, 4.0]),
                stump(vec![0.0, 3.0, 1.0], vec![0.0, 1.0, 1.0]),
            ],
            Aggregation::Vote {
                classes: vec![2.0, 5.0, 10.0],
            },
            Some(1),
        )
        .unwrap();
        // left: (0.8+0, 0.2+0.75, 0+0.25) → class 5
        assert_eq!(ensemble.predict(&[0.0]).unwrap(), 5.0);
        // right: (0, 0.5, 1.5) → class 10
        assert_eq!(ensemble.predict(&[1.0]).unwrap(), 10.0);
    }

    #[test]
    fn vote_tie_takes_first_class() {
        let ensemble = TreeEnsemble::new(
            "tie",
            vec![stump(vec![1.0, 1.0], vec![1.0, 1.0])],
            Aggregation::Vote {
                classes: vec![3.0, 7.0],
            },
            None,
        )
        .unwrap();
        assert_eq!(ensemble.predict(&[0.0]).unwrap(), 3.0);
    }

    #[test]
    fn boosted_sums_leaves() {
        let ensemble = TreeEnsemble::new(
            "hours",
            vec![stump(vec![2.0], vec![-1.0]), stump(vec![4.0], vec![1.0])],
            Aggregation::Boosted {
                init: 10.0,
                learning_rate: 0.5,
            },
            Some(1),
        )
        .unwrap();
        assert_eq!(ensemble.predict(&[0.0]).unwrap(), 13.0);
        assert_eq!(ensemble.predict(&[1.0]).unwrap(), 10.0);
    }

    #[test]
    fn short_row_is_an_error() {
        let tree = DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![3, -2, -2],
            threshold: vec![0.0, 0.0, 0.0],
            value: vec![vec![0.0], vec![1.0], vec![2.0]],
        };
        assert!(matches!(
            tree.leaf(&[0.0]),
            Err(PredictionError::FeatureMismatch { expected: 4, .. })
        ));
    }

    #[test]
    fn rejects_broken_trees() {
        let mut cyclic = stump(vec![1.0], vec![2.0]);
        cyclic.children_left[0] = 0;
        assert!(cyclic.validate("t", 1, None).is_err());

        let mut ragged = stump(vec![1.0], vec![2.0]);
        ragged.threshold.pop();
        assert!(ragged.validate("t", 1, None).is_err());

        let wide = stump(vec![1.0], vec![2.0]);
        assert!(wide.validate("t", 2, None).is_err());

        let unknown_feature = stump(vec![1.0], vec![2.0]);
        assert!(unknown_feature.validate("t", 1, Some(0)).is_err());

        assert!(TreeEnsemble::new(
            "empty",
            vec![],
            Aggregation::Boosted {
                init: 0.0,
                learning_rate: 1.0
            },
            None
        )
        .is_err());
    }
}
