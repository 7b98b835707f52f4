//! Nearest-centroid classification for univariate series panels.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::{Panel, Series};
use crate::error::{EstimatorError, Result};
use crate::estimators::{
    check_classifier_input, distinct_classes, ClassLabel, Classifier, Estimator,
};
use crate::tags::Tags;

/// Hyper-parameters for [`NearestCentroidClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentroidConfig {
    /// Softmax temperature for `predict_proba`. Larger values sharpen the
    /// distribution towards the nearest centroid.
    pub temperature: f64,
}

impl Default for CentroidConfig {
    fn default() -> Self {
        CentroidConfig { temperature: 1.0 }
    }
}

/// Classifies by Euclidean distance to per-class mean series.
///
/// Univariate only: multivariate panels are rejected in `fit` with the
/// standard "X must be univariate" validation error. `predict_proba` is a
/// softmax over negative centroid distances, so rows always sum to one.
pub struct NearestCentroidClassifier {
    config: CentroidConfig,
    centroids: Vec<Vec<f64>>,
    classes: Vec<ClassLabel>,
}

impl NearestCentroidClassifier {
    pub fn new(config: CentroidConfig) -> Self {
        NearestCentroidClassifier {
            config,
            centroids: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn create_test_instance() -> Self {
        Self::new(CentroidConfig::default())
    }

    fn check_fitted(&self) -> Result<()> {
        if self.centroids.is_empty() {
            return Err(EstimatorError::NotFitted("NearestCentroidClassifier"));
        }
        Ok(())
    }

    fn distances_to_centroids(&self, instance: &Series) -> Vec<f64> {
        self.centroids
            .iter()
            .map(|centroid| {
                let n = centroid.len().min(instance.n_timepoints());
                let mut acc = 0.0;
                for t in 0..n {
                    let d = instance.values()[(t, 0)] - centroid[t];
                    acc += d * d;
                }
                acc.sqrt()
            })
            .collect()
    }
}

impl Estimator for NearestCentroidClassifier {
    fn name(&self) -> &'static str {
        "NearestCentroidClassifier"
    }

    fn tags(&self) -> Tags {
        // No capability:multivariate entry, so the default (false) applies.
        Tags::new()
    }
}

impl Classifier for NearestCentroidClassifier {
    fn fit(&mut self, x: &Panel, y: &[ClassLabel]) -> Result<()> {
        check_classifier_input(x, &self.tags())?;
        if x.n_instances() != y.len() {
            return Err(EstimatorError::InvalidInput(format!(
                "X has {} instances but y has {} labels",
                x.n_instances(),
                y.len()
            )));
        }

        self.classes = distinct_classes(y);

        // Group instances by class, then average pointwise up to the
        // shortest instance in the group.
        let mut groups: BTreeMap<&str, Vec<&Series>> = BTreeMap::new();
        for (instance, label) in x.instances().iter().zip(y.iter()) {
            groups.entry(label.as_str()).or_default().push(instance);
        }

        self.centroids = self
            .classes
            .iter()
            .map(|class| {
                let members = &groups[class.as_str()];
                let len = members
                    .iter()
                    .map(|s| s.n_timepoints())
                    .min()
                    .unwrap_or(0);
                (0..len)
                    .map(|t| {
                        members.iter().map(|s| s.values()[(t, 0)]).sum::<f64>()
                            / members.len() as f64
                    })
                    .collect()
            })
            .collect();

        log::debug!(
            "Fitted {} with {} centroids",
            self.name(),
            self.centroids.len()
        );
        Ok(())
    }

    fn predict(&self, x: &Panel) -> Result<Vec<ClassLabel>> {
        self.check_fitted()?;
        Ok(x.instances()
            .iter()
            .map(|instance| {
                let dists = self.distances_to_centroids(instance);
                let mut best = 0usize;
                for j in 1..dists.len() {
                    if dists[j] < dists[best] {
                        best = j;
                    }
                }
                self.classes[best].clone()
            })
            .collect())
    }

    fn predict_proba(&self, x: &Panel) -> Result<Array2<f64>> {
        self.check_fitted()?;
        let n_classes = self.classes.len();
        let mut proba = Array2::zeros((x.n_instances(), n_classes));

        for (i, instance) in x.instances().iter().enumerate() {
            let dists = self.distances_to_centroids(instance);
            // Softmax over negative distances, shifted by the minimum for
            // numerical stability.
            let min_dist = dists.iter().cloned().fold(f64::INFINITY, f64::min);
            let weights: Vec<f64> = dists
                .iter()
                .map(|d| (-(d - min_dist) * self.config.temperature).exp())
                .collect();
            let total: f64 = weights.iter().sum();
            for j in 0..n_classes {
                proba[(i, j)] = weights[j] / total;
            }
        }
        Ok(proba)
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }
}
