//! Estimator lifecycle traits.
//!
//! These centralize the fit/predict/transform contract so classifier and
//! transformer implementations can live next to their model code. Capability
//! declaration happens through [`Tags`]; callers (the conformance harness,
//! pipelines) check tags before invoking optional methods.

use ndarray::Array2;

use crate::data::{Data, Panel};
use crate::error::{EstimatorError, Result};
use crate::tags::{Tags, CAPABILITY_MULTIVARIATE};

/// Class labels are plain strings, matching the dataset loaders.
pub type ClassLabel = String;

/// Common surface of all estimators: a name, a tag mapping, and an optional
/// random seed hook for implementations with stochastic behavior.
pub trait Estimator {
    /// Human readable name, also the key into golden-output tables.
    fn name(&self) -> &'static str;

    /// The estimator's capability tags.
    fn tags(&self) -> Tags;

    /// Set the random seed, if the estimator has stochastic behavior.
    /// Deterministic estimators ignore this.
    fn set_random_state(&mut self, _seed: u64) {}
}

/// A time-series classifier over panel data.
pub trait Classifier: Estimator {
    /// Fit the classifier. `y` carries one label per panel instance.
    fn fit(&mut self, x: &Panel, y: &[ClassLabel]) -> Result<()>;

    /// Predict one label per instance of `x`.
    fn predict(&self, x: &Panel) -> Result<Vec<ClassLabel>>;

    /// Predict class membership probabilities, shape (n_instances, n_classes).
    /// Columns follow `classes()` order; every row sums to one.
    fn predict_proba(&self, x: &Panel) -> Result<Array2<f64>>;

    /// Distinct training labels in column order of `predict_proba`.
    /// Empty before `fit`.
    fn classes(&self) -> &[ClassLabel];
}

/// A time-series transformer over data containers of any scitype.
pub trait Transformer: Estimator {
    fn fit(&mut self, x: &Data) -> Result<()>;

    fn transform(&self, x: &Data) -> Result<Data>;

    /// Inverse of `transform`, where the capability tag declares one.
    /// The default refuses; implementations with
    /// `capability:inverse_transform` must override.
    fn inverse_transform(&self, _x: &Data) -> Result<Data> {
        Err(EstimatorError::Unsupported("inverse_transform"))
    }
}

/// Validate classifier input arity against the estimator's capability tags.
///
/// Univariate-only classifiers must reject multi-channel panels with the
/// exact message prefix conformance checks match on.
pub fn check_classifier_input(x: &Panel, tags: &Tags) -> Result<()> {
    if x.is_empty() {
        return Err(EstimatorError::InvalidInput(
            "X must contain at least one instance".to_string(),
        ));
    }
    if !tags.get_bool(CAPABILITY_MULTIVARIATE) && !x.is_univariate() {
        return Err(EstimatorError::InvalidInput(format!(
            "X must be univariate, but X has {} channels",
            x.n_channels()
        )));
    }
    Ok(())
}

/// Validate transformer input arity against the estimator's capability tags.
pub fn check_transformer_input(x: &Data, tags: &Tags) -> Result<()> {
    if !tags.get_bool(CAPABILITY_MULTIVARIATE) && !x.is_univariate() {
        return Err(EstimatorError::InvalidInput(
            "X must be univariate; this transformer does not support multivariate input"
                .to_string(),
        ));
    }
    Ok(())
}

/// Sorted distinct labels, defining `predict_proba` column order.
pub fn distinct_classes(y: &[ClassLabel]) -> Vec<ClassLabel> {
    let mut classes: Vec<ClassLabel> = y.to_vec();
    classes.sort();
    classes.dedup();
    classes
}
