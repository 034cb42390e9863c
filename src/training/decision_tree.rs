//! Regression tree grown with the squared-error criterion

use crate::error::{RealtyError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Best split found for a node
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    // weighted child sum of squared errors
    child_sse: f64,
}

/// Regression tree grown until leaves are pure. Every feature is considered
/// at every split.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    n_features: usize,
}

impl DecisionTree {
    pub fn new_regressor() -> Self {
        Self::default()
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(RealtyError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(RealtyError::TrainingError("cannot grow a tree on zero samples".to_string()));
        }

        self.n_features = x.ncols();
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(Self::build_tree(x, y, indices));

        Ok(self)
    }

    fn build_tree(x: &Array2<f64>, y: &Array1<f64>, indices: Vec<usize>) -> TreeNode {
        let n_samples = indices.len();
        let (sum, sq_sum) = indices
            .iter()
            .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]));
        let leaf_value = sum / n_samples as f64;
        let node_sse = sse(n_samples, sum, sq_sum);

        let should_stop = n_samples < 2 || node_sse <= f64::EPSILON * sq_sum.max(1.0);

        if should_stop {
            return TreeNode::Leaf { value: leaf_value, n_samples };
        }

        let Some(split) = Self::find_best_split(x, y, &indices, node_sse) else {
            return TreeNode::Leaf { value: leaf_value, n_samples };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[[i, split.feature_idx]] <= split.threshold);

        if left_indices.is_empty() || right_indices.is_empty() {
            return TreeNode::Leaf { value: leaf_value, n_samples };
        }

        let left = Box::new(Self::build_tree(x, y, left_indices));
        let right = Box::new(Self::build_tree(x, y, right_indices));

        TreeNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left,
            right,
            n_samples,
        }
    }

    /// Scan every feature in sorted order with running sums. Ties in the
    /// improvement keep the lower feature index.
    fn find_best_split(
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        node_sse: f64,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature_idx in 0..x.ncols() {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (x[[i, feature_idx]], y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            if pairs[0].0 == pairs[n - 1].0 {
                continue;
            }

            let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
            let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let (value, target) = pairs[pos];
                left_sum += target;
                left_sq += target * target;

                let next_value = pairs[pos + 1].0;
                if value == next_value {
                    continue;
                }

                let left_count = pos + 1;
                let right_count = n - left_count;

                let child_sse = sse(left_count, left_sum, left_sq)
                    + sse(right_count, total_sum - left_sum, total_sq - left_sq);

                if best.map_or(true, |b| child_sse < b.child_sse) {
                    let mut threshold = (value + next_value) / 2.0;
                    // midpoint of adjacent floats can round up to the right value
                    if threshold >= next_value {
                        threshold = value;
                    }
                    best = Some(SplitCandidate { feature_idx, threshold, child_sse });
                }
            }
        }

        best.filter(|b| b.child_sse < node_sse)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(RealtyError::ModelNotFitted)?;
        if x.ncols() != self.n_features {
            return Err(RealtyError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows().into_iter().map(|row| Self::predict_sample(root, row)).collect())
    }

    fn predict_sample(node: &TreeNode, sample: ndarray::ArrayView1<f64>) -> f64 {
        let mut node = node;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    node = if sample[*feature_idx] <= *threshold { left } else { right };
                }
            }
        }
    }
}

fn sse(count: usize, sum: f64, sq_sum: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (sq_sum - sum * sum / count as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_regressor_simple() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = array![1.0, 1.0, 1.0, 5.0, 5.0, 5.0];

        let mut tree = DecisionTree::new_regressor();
        tree.fit(&x, &y).unwrap();

        let pred = tree.predict(&array![[2.0], [5.5], [3.5]]).unwrap();
        assert!((pred[0] - 1.0).abs() < 1e-12);
        assert!((pred[1] - 5.0).abs() < 1e-12);
        // one split at the midpoint
        assert!((pred[2] - 1.0).abs() < 1e-12);
        assert!(matches!(&tree.root, Some(TreeNode::Split { threshold, .. }) if *threshold == 3.5));
    }

    #[test]
    fn test_fully_grown_tree_memorizes() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0]];
        let y = array![3.0, -1.0, 7.0, 2.0, 0.5];

        let mut tree = DecisionTree::new_regressor();
        tree.fit(&x, &y).unwrap();
        let pred = tree.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];

        let mut tree = DecisionTree::new_regressor();
        tree.fit(&x, &y).unwrap();
        assert!(matches!(tree.root, Some(TreeNode::Leaf { n_samples: 3, .. })));
        assert_eq!(tree.predict(&array![[10.0]]).unwrap()[0], 4.0);
    }

    #[test]
    fn test_split_prefers_informative_feature() {
        // only the second feature carries signal
        let x = array![[5.0, 0.0], [1.0, 0.0], [4.0, 1.0], [2.0, 1.0], [3.0, 0.0], [6.0, 1.0]];
        let y = array![0.0, 0.0, 10.0, 10.0, 0.0, 10.0];

        let mut tree = DecisionTree::new_regressor();
        tree.fit(&x, &y).unwrap();
        assert!(matches!(tree.root, Some(TreeNode::Split { feature_idx: 1, .. })));
    }

    #[test]
    fn test_unfitted() {
        let tree = DecisionTree::new_regressor();
        assert!(matches!(tree.predict(&array![[1.0]]), Err(RealtyError::ModelNotFitted)));
    }

    #[test]
    fn test_predict_width_mismatch() {
        let mut tree = DecisionTree::new_regressor();
        tree.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).unwrap();
        assert!(tree.predict(&array![[1.0, 2.0]]).is_err());
    }
}
