//! k-nearest-neighbor classification on time-series panels.

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{Panel, Series};
use crate::error::{EstimatorError, Result};
use crate::estimators::{
    check_classifier_input, distinct_classes, ClassLabel, Classifier, Estimator,
};
use crate::tags::{Tags, CAPABILITY_MULTIVARIATE};

/// Hyper-parameters for [`KNeighborsTimeSeriesClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnConfig {
    pub n_neighbors: usize,
}

impl Default for KnnConfig {
    fn default() -> Self {
        KnnConfig { n_neighbors: 1 }
    }
}

/// k-NN time-series classifier with Euclidean distance over flattened values.
///
/// Deterministic: distance ties resolve to the lower training index, and
/// probability ties in `predict` resolve to the lexicographically first class.
/// Handles multivariate input by summing squared differences across channels.
pub struct KNeighborsTimeSeriesClassifier {
    config: KnnConfig,
    x_train: Option<Panel>,
    y_train: Vec<ClassLabel>,
    classes: Vec<ClassLabel>,
}

impl KNeighborsTimeSeriesClassifier {
    pub fn new(config: KnnConfig) -> Self {
        KNeighborsTimeSeriesClassifier {
            config,
            x_train: None,
            y_train: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Instance used by the conformance harness: 1-NN.
    pub fn create_test_instance() -> Self {
        Self::new(KnnConfig::default())
    }

    fn fitted_train(&self) -> Result<&Panel> {
        self.x_train
            .as_ref()
            .ok_or(EstimatorError::NotFitted("KNeighborsTimeSeriesClassifier"))
    }

    /// Class vote fractions among the k nearest training instances.
    fn vote_row(&self, train: &Panel, query: &Series) -> Vec<f64> {
        let mut distances: Vec<(usize, f64)> = train
            .instances()
            .iter()
            .enumerate()
            .map(|(i, s)| (i, squared_distance(query, s)))
            .collect();
        distances.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let k = self.config.n_neighbors.min(distances.len()).max(1);
        let mut votes = vec![0.0f64; self.classes.len()];
        for &(train_idx, _) in distances.iter().take(k) {
            let class_idx = self
                .classes
                .iter()
                .position(|c| c == &self.y_train[train_idx])
                .expect("training label missing from class list");
            votes[class_idx] += 1.0;
        }
        for v in votes.iter_mut() {
            *v /= k as f64;
        }
        votes
    }
}

impl Estimator for KNeighborsTimeSeriesClassifier {
    fn name(&self) -> &'static str {
        "KNeighborsTimeSeriesClassifier"
    }

    fn tags(&self) -> Tags {
        Tags::new().with_bool(CAPABILITY_MULTIVARIATE, true)
    }
}

impl Classifier for KNeighborsTimeSeriesClassifier {
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
        self.x_train = Some(x.clone());
        self.y_train = y.to_vec();
        log::debug!(
            "Fitted {} on {} instances, {} classes",
            self.name(),
            x.n_instances(),
            self.classes.len()
        );
        Ok(())
    }

    fn predict(&self, x: &Panel) -> Result<Vec<ClassLabel>> {
        let proba = self.predict_proba(x)?;
        Ok(argmax_labels(&proba, &self.classes))
    }

    fn predict_proba(&self, x: &Panel) -> Result<Array2<f64>> {
        let train = self.fitted_train()?;

        let rows: Vec<Vec<f64>> = x
            .instances()
            .par_iter()
            .map(|query| self.vote_row(train, query))
            .collect();

        let mut proba = Array2::zeros((x.n_instances(), self.classes.len()));
        for (i, row) in rows.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                proba[(i, j)] = p;
            }
        }
        Ok(proba)
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }
}

/// Squared Euclidean distance over the overlapping (timepoint, channel) grid.
fn squared_distance(a: &Series, b: &Series) -> f64 {
    let n_t = a.n_timepoints().min(b.n_timepoints());
    let n_c = a.n_channels().min(b.n_channels());
    let mut acc = 0.0;
    for t in 0..n_t {
        for c in 0..n_c {
            let d = a.values()[(t, c)] - b.values()[(t, c)];
            acc += d * d;
        }
    }
    acc
}

/// Per-row argmax over a probability matrix, mapped to class labels.
/// Ties resolve to the lowest column index.
pub(crate) fn argmax_labels(proba: &Array2<f64>, classes: &[ClassLabel]) -> Vec<ClassLabel> {
    (0..proba.nrows())
        .map(|i| {
            let mut best = 0usize;
            for j in 1..proba.ncols() {
                if proba[(i, j)] > proba[(i, best)] {
                    best = j;
                }
            }
            classes[best].clone()
        })
        .collect()
}
