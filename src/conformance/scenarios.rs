//! Test scenarios: immutable bundles of example inputs keyed by method.
//!
//! A scenario pairs fixed example data with expectation tags (class count,
//! input scitype) and drives an estimator through an ordered method
//! sequence. The runner threads fitted state implicitly (it lives in the
//! estimator) and returns the final method's output. It performs no
//! capability checking; callers consult tags before choosing a sequence.

use ndarray::Array2;

use crate::data::{Data, Hierarchical, Panel, Scitype, Series};
use crate::datasets::{make_classification_y, make_panel_x};
use crate::error::Result;
use crate::estimators::{ClassLabel, Classifier, Transformer};

const SCENARIO_SEED: u64 = 42;

/// Methods a classifier scenario can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMethod {
    Fit,
    Predict,
    PredictProba,
}

/// Output of the final step of a classifier method sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput {
    None,
    Labels(Vec<ClassLabel>),
    Proba(Array2<f64>),
}

/// Fixed fit/predict example data for classifier conformance checks.
pub struct ClassifierScenario {
    pub name: &'static str,
    pub fit_x: Panel,
    pub fit_y: Vec<ClassLabel>,
    pub predict_x: Panel,
    /// Expected class count, the `n_classes` scenario tag.
    pub n_classes: usize,
    /// Whether the scenario feeds multivariate data.
    pub multivariate: bool,
}

impl ClassifierScenario {
    /// Invoke `methods` in order on `estimator`, returning the last output.
    pub fn run(
        &self,
        estimator: &mut dyn Classifier,
        methods: &[ClassifierMethod],
    ) -> Result<ClassifierOutput> {
        let mut output = ClassifierOutput::None;
        for method in methods {
            output = match method {
                ClassifierMethod::Fit => {
                    estimator.fit(&self.fit_x, &self.fit_y)?;
                    ClassifierOutput::None
                }
                ClassifierMethod::Predict => {
                    ClassifierOutput::Labels(estimator.predict(&self.predict_x)?)
                }
                ClassifierMethod::PredictProba => {
                    ClassifierOutput::Proba(estimator.predict_proba(&self.predict_x)?)
                }
            };
        }
        Ok(output)
    }
}

/// The standard univariate classifier scenario.
pub fn classifier_fit_predict() -> ClassifierScenario {
    let n_classes = 2;
    let fit_y = make_classification_y(10, n_classes, SCENARIO_SEED);
    ClassifierScenario {
        name: "ClassifierFitPredict",
        fit_x: make_panel_x(10, 1, 20, SCENARIO_SEED, Some(&fit_y)),
        predict_x: make_panel_x(5, 1, 20, SCENARIO_SEED + 1, None),
        fit_y,
        n_classes,
        multivariate: false,
    }
}

/// The multivariate classifier scenario, used both for the multivariate
/// capability path and the univariate-only exception check.
pub fn classifier_fit_predict_multivariate() -> ClassifierScenario {
    let n_classes = 2;
    let fit_y = make_classification_y(10, n_classes, SCENARIO_SEED);
    ClassifierScenario {
        name: "ClassifierFitPredictMultivariate",
        fit_x: make_panel_x(10, 2, 20, SCENARIO_SEED, Some(&fit_y)),
        predict_x: make_panel_x(5, 2, 20, SCENARIO_SEED + 1, None),
        fit_y,
        n_classes,
        multivariate: true,
    }
}

/// All classifier scenarios, in fixture order.
pub fn retrieve_classifier_scenarios() -> Vec<ClassifierScenario> {
    vec![classifier_fit_predict(), classifier_fit_predict_multivariate()]
}

/// Methods a transformer scenario can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerMethod {
    Fit,
    Transform,
    InverseTransform,
}

/// Fixed fit/transform example data for transformer conformance checks.
pub struct TransformerScenario {
    pub name: &'static str,
    /// Used for both `fit` and `transform`, matching the fixture convention.
    pub x: Data,
    /// The `X_scitype` scenario tag.
    pub x_scitype: Scitype,
}

impl TransformerScenario {
    /// Invoke `methods` in order on `estimator`. `Transform` output feeds
    /// a later `InverseTransform` step; the last output is returned.
    pub fn run(
        &self,
        estimator: &mut dyn Transformer,
        methods: &[TransformerMethod],
    ) -> Result<Option<Data>> {
        let mut output: Option<Data> = None;
        for method in methods {
            output = match method {
                TransformerMethod::Fit => {
                    estimator.fit(&self.x)?;
                    None
                }
                TransformerMethod::Transform => Some(estimator.transform(&self.x)?),
                TransformerMethod::InverseTransform => {
                    let input = output.as_ref().unwrap_or(&self.x);
                    Some(estimator.inverse_transform(input)?)
                }
            };
        }
        Ok(output)
    }
}

fn univariate_series(n: usize, offset: f64) -> Series {
    // Positive, trending values with some non-monotone texture.
    Series::from_vec(
        (0..n)
            .map(|t| offset + 1.0 + 0.5 * t as f64 + if t % 2 == 0 { 0.25 } else { 0.0 })
            .collect(),
    )
}

/// Series-scitype transformer scenario.
pub fn transformer_fit_transform_series() -> TransformerScenario {
    TransformerScenario {
        name: "TransformerFitTransformSeriesUnivariate",
        x: Data::Series(univariate_series(12, 0.0)),
        x_scitype: Scitype::Series,
    }
}

/// Panel-scitype transformer scenario.
pub fn transformer_fit_transform_panel() -> TransformerScenario {
    let instances = (0..3).map(|i| univariate_series(12, i as f64)).collect();
    TransformerScenario {
        name: "TransformerFitTransformPanel",
        x: Data::Panel(Panel::new(instances)),
        x_scitype: Scitype::Panel,
    }
}

/// Hierarchical-scitype transformer scenario.
pub fn transformer_fit_transform_hierarchical() -> TransformerScenario {
    let panels = (0..2)
        .map(|p| {
            Panel::new(
                (0..2)
                    .map(|i| univariate_series(12, (p * 2 + i) as f64))
                    .collect(),
            )
        })
        .collect();
    TransformerScenario {
        name: "TransformerFitTransformHierarchical",
        x: Data::Hierarchical(Hierarchical::new(panels)),
        x_scitype: Scitype::Hierarchical,
    }
}

/// Multivariate series scenario for the univariate-only error check.
pub fn transformer_fit_transform_series_multivariate() -> TransformerScenario {
    let n = 12;
    let mut values = Array2::zeros((n, 2));
    for t in 0..n {
        values[(t, 0)] = 1.0 + t as f64;
        values[(t, 1)] = 2.0 + 0.5 * t as f64;
    }
    TransformerScenario {
        name: "TransformerFitTransformSeriesMultivariate",
        x: Data::Series(Series::new((0..n as i64).collect(), values)),
        x_scitype: Scitype::Series,
    }
}

/// All transformer scenarios, in fixture order.
pub fn retrieve_transformer_scenarios() -> Vec<TransformerScenario> {
    vec![
        transformer_fit_transform_series(),
        transformer_fit_transform_panel(),
        transformer_fit_transform_hierarchical(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::KNeighborsTimeSeriesClassifier;
    use crate::transformations::ExponentTransformer;

    #[test]
    fn runner_returns_final_output() {
        let scenario = classifier_fit_predict();
        let mut clf = KNeighborsTimeSeriesClassifier::create_test_instance();

        let out = scenario
            .run(&mut clf, &[ClassifierMethod::Fit, ClassifierMethod::Predict])
            .unwrap();
        match out {
            ClassifierOutput::Labels(labels) => assert_eq!(labels.len(), 5),
            other => panic!("expected labels, got {:?}", other),
        }
    }

    #[test]
    fn fitted_state_persists_between_runs() {
        let scenario = classifier_fit_predict();
        let mut clf = KNeighborsTimeSeriesClassifier::create_test_instance();

        scenario.run(&mut clf, &[ClassifierMethod::Fit]).unwrap();
        // second run without fit relies on state mutated by the first
        let out = scenario
            .run(&mut clf, &[ClassifierMethod::PredictProba])
            .unwrap();
        assert!(matches!(out, ClassifierOutput::Proba(_)));
    }

    #[test]
    fn inverse_step_consumes_transform_output() {
        let scenario = transformer_fit_transform_series();
        let mut t = ExponentTransformer::new(2.0);

        let out = scenario
            .run(
                &mut t,
                &[
                    TransformerMethod::Fit,
                    TransformerMethod::Transform,
                    TransformerMethod::InverseTransform,
                ],
            )
            .unwrap()
            .unwrap();
        let original = scenario.x.as_series().unwrap();
        let restored = out.as_series().unwrap();
        for i in 0..original.n_timepoints() {
            assert!((original.values()[(i, 0)] - restored.values()[(i, 0)]).abs() < 1e-9);
        }
    }
}
