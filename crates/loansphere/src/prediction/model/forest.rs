use serde::Deserialize;

const LEAF: i64 = -1;

/// One fitted decision tree in the parallel-array layout used by scikit-learn exports.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Children must come after their parent, which rules out cycles during traversal.
    pub(crate) fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let nodes = self.children_left.len();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err(format!("node arrays disagree on length (expected {nodes})"));
        }

        for node in 0..nodes {
            let left = self.children_left[node];
            let right = self.children_right[node];

            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("node {node} has exactly one child"));
                }
                let distribution = &self.value[node];
                if distribution.len() != n_classes {
                    return Err(format!(
                        "leaf {node} holds {} class weights, expected {n_classes}",
                        distribution.len()
                    ));
                }
                if distribution.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
                    return Err(format!("leaf {node} holds an invalid class weight"));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(format!("node {node} points to invalid child {child}"));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }

        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `row`.
    ///
    /// Feature values are rounded to `f32` before each split, matching how scikit-learn
    /// trees see their input; thresholds stay `f64`.
    pub(crate) fn class_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            let value = f64::from(row[feature] as f32);
            node = if value <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|weight| weight / total).collect()
        } else {
            vec![0.0; weights.len()]
        }
    }
}

/// Bagged ensemble that averages per-tree class probabilities.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub(crate) fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features, n_classes)
                .map_err(|reason| format!("tree {index}: {reason}"))?;
        }
        Ok(())
    }

    pub(crate) fn predict_proba(&self, row: &[f64], n_classes: usize) -> Vec<f64> {
        let mut totals = vec![0.0; n_classes];
        for tree in &self.trees {
            for (total, probability) in totals.iter_mut().zip(tree.class_distribution(row)) {
                *total += probability;
            }
        }

        let count = self.trees.len() as f64;
        totals.iter().map(|total| total / count).collect()
    }

    /// Index of the most probable class; ties resolve to the lowest index.
    pub(crate) fn predict_index(&self, row: &[f64], n_classes: usize) -> usize {
        let probabilities = self.predict_proba(row, n_classes);
        let mut best = 0;
        for (index, probability) in probabilities.iter().enumerate().skip(1) {
            if *probability > probabilities[best] {
                best = index;
            }
        }
        best
    }
}
