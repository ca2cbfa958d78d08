use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("forest has no trees")]
    NoTrees,

    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree} node {node}: child index {child} is out of order or out of range")]
    BadChild { tree: usize, node: usize, child: usize },

    #[error("tree {tree} node {node}: feature {feature} exceeds feature count {n_features}")]
    BadFeature { tree: usize, node: usize, feature: usize, n_features: usize },

    #[error("tree {tree} node {node}: leaf has {actual} class weights, expected {expected}")]
    BadLeaf { tree: usize, node: usize, actual: usize, expected: usize },

    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// One node of a fitted decision tree, stored in pre-order
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Per-class sample weights reaching this leaf
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk to the leaf for `row`. Samples with `row[feature] <= threshold` go left.
    fn leaf(&self, row: &[f64]) -> &[f64] {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if row[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ForestError> {
        if self.nodes.is_empty() {
            return Err(ForestError::EmptyTree { tree });
        }
        for (node, entry) in self.nodes.iter().enumerate() {
            match entry {
                TreeNode::Split { feature, left, right, .. } => {
                    if *feature >= n_features {
                        return Err(ForestError::BadFeature {
                            tree,
                            node,
                            feature: *feature,
                            n_features,
                        });
                    }
                    // Children after their parent guarantees every walk terminates.
                    for child in [*left, *right] {
                        if child <= node || child >= self.nodes.len() {
                            return Err(ForestError::BadChild { tree, node, child });
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ForestError::BadLeaf {
                            tree,
                            node,
                            actual: value.len(),
                            expected: n_classes,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fitted random-forest classifier
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Check the structure once so prediction can index without bounds surprises
    pub fn validate(&self, n_classes: usize) -> Result<(), ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::NoTrees);
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(tree, t)| t.validate(tree, self.n_features, n_classes))
    }

    /// Class probabilities for one encoded row: the mean of each tree's
    /// normalized leaf distribution
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ForestError> {
        if row.len() != self.n_features {
            return Err(ForestError::ShapeMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let mut probabilities: Vec<f64> = Vec::new();
        for tree in &self.trees {
            let leaf = tree.leaf(row);
            if probabilities.is_empty() {
                probabilities = vec![0.0; leaf.len()];
            }
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                for (p, weight) in probabilities.iter_mut().zip(leaf) {
                    *p += weight / total;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        probabilities.iter_mut().for_each(|p| *p /= n_trees);
        Ok(probabilities)
    }
}
