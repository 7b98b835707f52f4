//! Conformance assertions shared by the estimator test suites.
//!
//! Each check returns `anyhow::Result<()>`: `Ok` means the estimator
//! conforms (or the check does not apply, per its capability tags), an
//! `Err` carries the first violated expectation. Expected input-validation
//! errors are matched by message substring; any other estimator error
//! propagates as a failure.

use anyhow::{bail, Context, Result};
use ndarray::Array2;

use crate::data::{check_is_scitype, Data, Panel, Scitype};
use crate::estimators::{ClassLabel, Classifier, Estimator, Transformer};
use crate::tags::{
    CAPABILITY_INVERSE_TRANSFORM, CAPABILITY_MULTIVARIATE, FIT_IN_TRANSFORM, SAME_TIME_INDEX,
    TRANSFORM_INPUT_SCITYPE, TRANSFORM_OUTPUT_SCITYPE,
};

use super::scenarios::{
    classifier_fit_predict_multivariate, transformer_fit_transform_series_multivariate,
    ClassifierMethod, ClassifierOutput, ClassifierScenario, TransformerMethod,
    TransformerScenario,
};

/// Tolerance-based equality for probability and value matrices, to the
/// given number of decimal places.
pub fn assert_array_almost_equal(
    actual: &Array2<f64>,
    expected: &Array2<f64>,
    decimal: i32,
) -> Result<()> {
    if actual.dim() != expected.dim() {
        bail!(
            "shape mismatch: actual {:?}, expected {:?}",
            actual.dim(),
            expected.dim()
        );
    }
    let tol = 1.5 * 10f64.powi(-decimal);
    for ((i, j), &a) in actual.indexed_iter() {
        let e = expected[(i, j)];
        if (a - e).abs() > tol {
            bail!(
                "arrays differ at ({}, {}): actual {}, expected {} (tol {})",
                i,
                j,
                a,
                e,
                tol
            );
        }
    }
    Ok(())
}

/// Tolerance-based equality across data containers of the same scitype.
pub fn assert_data_almost_equal(actual: &Data, expected: &Data, decimal: i32) -> Result<()> {
    match (actual, expected) {
        (Data::Series(a), Data::Series(e)) => assert_array_almost_equal(a.values(), e.values(), decimal),
        (Data::Panel(a), Data::Panel(e)) => {
            if a.n_instances() != e.n_instances() {
                bail!(
                    "instance count mismatch: actual {}, expected {}",
                    a.n_instances(),
                    e.n_instances()
                );
            }
            for (i, (ai, ei)) in a.instances().iter().zip(e.instances()).enumerate() {
                assert_array_almost_equal(ai.values(), ei.values(), decimal)
                    .with_context(|| format!("panel instance {}", i))?;
            }
            Ok(())
        }
        (Data::Hierarchical(a), Data::Hierarchical(e)) => {
            if a.n_panels() != e.n_panels() {
                bail!(
                    "panel count mismatch: actual {}, expected {}",
                    a.n_panels(),
                    e.n_panels()
                );
            }
            for (p, (ap, ep)) in a.panels().iter().zip(e.panels()).enumerate() {
                assert_data_almost_equal(
                    &Data::Panel(ap.clone()),
                    &Data::Panel(ep.clone()),
                    decimal,
                )
                .with_context(|| format!("hierarchy panel {}", p))?;
            }
            Ok(())
        }
        (Data::Table(a), Data::Table(e)) => assert_array_almost_equal(a.rows(), e.rows(), decimal),
        (a, e) => bail!(
            "scitype mismatch: actual {}, expected {}",
            a.scitype().as_str(),
            e.scitype().as_str()
        ),
    }
}

/// Classifier output conformance: predict is flat with length n_samples and
/// labels drawn from the training set; predict_proba is (n_samples,
/// n_classes) with rows summing to one.
pub fn check_classifier_output(
    estimator: &mut dyn Classifier,
    scenario: &ClassifierScenario,
) -> Result<()> {
    let n_samples = scenario.predict_x.n_instances();

    let y_pred = match scenario.run(estimator, &[ClassifierMethod::Fit, ClassifierMethod::Predict])?
    {
        ClassifierOutput::Labels(labels) => labels,
        other => bail!("predict produced unexpected output {:?}", other),
    };
    if y_pred.len() != n_samples {
        bail!(
            "predict returned {} labels for {} samples",
            y_pred.len(),
            n_samples
        );
    }
    for label in &y_pred {
        if !scenario.fit_y.contains(label) {
            bail!("predicted label {:?} not seen in training labels", label);
        }
    }

    let y_proba = match scenario.run(estimator, &[ClassifierMethod::PredictProba])? {
        ClassifierOutput::Proba(proba) => proba,
        other => bail!("predict_proba produced unexpected output {:?}", other),
    };
    if y_proba.dim() != (n_samples, scenario.n_classes) {
        bail!(
            "predict_proba shape {:?}, expected ({}, {})",
            y_proba.dim(),
            n_samples,
            scenario.n_classes
        );
    }
    for i in 0..n_samples {
        let row_sum: f64 = (0..scenario.n_classes).map(|j| y_proba[(i, j)]).sum();
        if (row_sum - 1.0).abs() > 1e-6 {
            bail!("predict_proba row {} sums to {}, expected 1.0", i, row_sum);
        }
    }
    Ok(())
}

/// Univariate-only classifiers must reject multivariate `fit` input with a
/// value error containing "X must be univariate"; multivariate-capable
/// classifiers must accept it silently.
pub fn check_multivariate_input_exception(build: fn() -> Box<dyn Classifier>) -> Result<()> {
    let mut estimator = build();
    let scenario = classifier_fit_predict_multivariate();

    if estimator.tags().get_bool(CAPABILITY_MULTIVARIATE) {
        scenario
            .run(estimator.as_mut(), &[ClassifierMethod::Fit])
            .with_context(|| {
                format!(
                    "{} declares capability:multivariate but rejected multivariate X",
                    estimator.name()
                )
            })?;
        return Ok(());
    }

    match scenario.run(estimator.as_mut(), &[ClassifierMethod::Fit]) {
        Err(err) if err.to_string().contains("X must be univariate") => Ok(()),
        Err(err) => bail!(
            "{} raised the wrong error for multivariate X: {}",
            estimator.name(),
            err
        ),
        Ok(_) => bail!(
            "{} accepted multivariate X without capability:multivariate",
            estimator.name()
        ),
    }
}

/// Expected output scitype of a transform, as a function of the input
/// scitype and the transformer's declared input/output scitypes.
pub fn expected_transform_output_scitype(
    x_scitype: Scitype,
    trafo_input: Scitype,
    trafo_output: Scitype,
) -> Option<Scitype> {
    if trafo_input == Scitype::Series && trafo_output == Scitype::Series {
        return Some(x_scitype);
    }
    if trafo_output == Scitype::Primitives {
        return Some(Scitype::Table);
    }
    if trafo_input == Scitype::Series && trafo_output == Scitype::Panel {
        return match x_scitype {
            Scitype::Series => Some(Scitype::Panel),
            Scitype::Panel | Scitype::Hierarchical => Some(Scitype::Hierarchical),
            _ => None,
        };
    }
    None
}

/// Transform output conformance: the output scitype matches the expectation
/// function, and sample/instance counts are preserved when the transformer
/// declares it keeps the time index.
pub fn check_fit_transform_output(
    estimator: &mut dyn Transformer,
    scenario: &TransformerScenario,
) -> Result<()> {
    let tags = estimator.tags();
    let trafo_input = tags
        .get_scitype(TRANSFORM_INPUT_SCITYPE)
        .context("transformer is missing the scitype:transform-input tag")?;
    let trafo_output = tags
        .get_scitype(TRANSFORM_OUTPUT_SCITYPE)
        .context("transformer is missing the scitype:transform-output tag")?;

    // Sanity: the scenario's declared X scitype must hold for its data.
    let (valid, msg, x_metadata) = check_is_scitype(&scenario.x, scenario.x_scitype);
    if !valid {
        bail!("scenario {} is inconsistent: {}", scenario.name, msg);
    }

    let xt = scenario
        .run(
            estimator,
            &[TransformerMethod::Fit, TransformerMethod::Transform],
        )?
        .context("transform produced no output")?;

    let expected_scitype =
        expected_transform_output_scitype(scenario.x_scitype, trafo_input, trafo_output)
            .with_context(|| {
                format!(
                    "no expected output scitype for X={} with transform {}→{}",
                    scenario.x_scitype.as_str(),
                    trafo_input.as_str(),
                    trafo_output.as_str()
                )
            })?;

    let (valid, msg, xt_metadata) = check_is_scitype(&xt, expected_scitype);
    if !valid {
        bail!(
            "{}.transform should return {} for {} input: {}",
            estimator.name(),
            expected_scitype.as_str(),
            scenario.x_scitype.as_str(),
            msg
        );
    }

    // Same-time-index transformers must keep sample and instance counts.
    if trafo_input == Scitype::Series
        && trafo_output == Scitype::Series
        && tags.get_bool(SAME_TIME_INDEX)
    {
        match scenario.x_scitype {
            Scitype::Series => {
                let n_before = scenario.x.as_series().map(|s| s.n_timepoints());
                let n_after = xt.as_series().map(|s| s.n_timepoints());
                if n_before != n_after {
                    bail!(
                        "{} changed sample count: {:?} -> {:?}",
                        estimator.name(),
                        n_before,
                        n_after
                    );
                }
            }
            Scitype::Panel | Scitype::Hierarchical => {
                if x_metadata.n_instances != xt_metadata.n_instances {
                    bail!(
                        "{} changed instance count: {} -> {}",
                        estimator.name(),
                        x_metadata.n_instances,
                        xt_metadata.n_instances
                    );
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Inverse-transform round trip: where the capability tag is set,
/// `inverse_transform(transform(X))` approximately equals `X` (restricted
/// to the output's index subset when the index is not preserved).
pub fn check_transform_inverse_transform_equivalent(
    estimator: &mut dyn Transformer,
    scenario: &TransformerScenario,
) -> Result<()> {
    if !estimator.tags().get_bool(CAPABILITY_INVERSE_TRANSFORM) {
        return Ok(());
    }

    let same_index = estimator.tags().get_bool(SAME_TIME_INDEX);
    let xit = scenario
        .run(
            estimator,
            &[
                TransformerMethod::Fit,
                TransformerMethod::Transform,
                TransformerMethod::InverseTransform,
            ],
        )?
        .context("inverse_transform produced no output")?;

    if same_index {
        return assert_data_almost_equal(&xit, &scenario.x, 6)
            .with_context(|| format!("{} round trip differs from X", estimator.name()));
    }

    // Index not preserved: compare on the round-trip output's own index.
    match (&xit, &scenario.x) {
        (Data::Series(restored), Data::Series(original)) => {
            let reference = original.select_index(restored.index());
            assert_array_almost_equal(restored.values(), reference.values(), 6)
                .with_context(|| format!("{} round trip differs on index subset", estimator.name()))
        }
        _ => assert_data_almost_equal(&xit, &scenario.x, 6)
            .with_context(|| format!("{} round trip differs from X", estimator.name())),
    }
}

/// The `capability:inverse_transform` tag must be backed by a working
/// implementation, not the refusing default.
pub fn check_capability_inverse_tag(estimator: &mut dyn Transformer) -> Result<()> {
    if !estimator.tags().get_bool(CAPABILITY_INVERSE_TRANSFORM) {
        return Ok(());
    }
    let scenario = super::scenarios::transformer_fit_transform_series();
    let xt = scenario
        .run(
            estimator,
            &[TransformerMethod::Fit, TransformerMethod::Transform],
        )?
        .context("transform produced no output")?;
    estimator.inverse_transform(&xt).with_context(|| {
        format!(
            "{} declares capability:inverse_transform but refuses inverse_transform",
            estimator.name()
        )
    })?;
    Ok(())
}

/// Feeding multivariate data to a univariate-only transformer must raise a
/// value error matching "univariate", in `fit` unless fitting folds into
/// `transform`, in which case it is raised there.
pub fn check_transformer_multivariate_error(build: fn() -> Box<dyn Transformer>) -> Result<()> {
    let mut estimator = build();
    if estimator.tags().get_bool(CAPABILITY_MULTIVARIATE) {
        return Ok(());
    }
    let scenario = transformer_fit_transform_series_multivariate();

    let sequence: &[TransformerMethod] = if estimator.tags().get_bool(FIT_IN_TRANSFORM) {
        &[TransformerMethod::Fit, TransformerMethod::Transform]
    } else {
        &[TransformerMethod::Fit]
    };

    match scenario.run(estimator.as_mut(), sequence) {
        Err(err) if err.to_string().contains("univariate") => Ok(()),
        Err(err) => bail!(
            "{} raised the wrong error for multivariate X: {}",
            estimator.name(),
            err
        ),
        Ok(_) => bail!(
            "{} accepted multivariate X without capability:multivariate",
            estimator.name()
        ),
    }
}

/// Golden-value regression: fitted on the reference training split, the
/// classifier's probabilities on the reference test inputs must match a
/// stored table to `decimal` places.
pub fn check_golden_proba(
    estimator: &mut dyn Classifier,
    x_train: &Panel,
    y_train: &[ClassLabel],
    x_test: &Panel,
    expected: &Array2<f64>,
    decimal: i32,
) -> Result<()> {
    estimator.set_random_state(0);
    estimator.fit(x_train, y_train)?;
    let proba = estimator.predict_proba(x_test)?;
    assert_array_almost_equal(&proba, expected, decimal)
        .with_context(|| format!("{} deviates from its reference probabilities", estimator.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_scitype_series_to_series_preserves_input() {
        for x in [Scitype::Series, Scitype::Panel, Scitype::Hierarchical] {
            assert_eq!(
                expected_transform_output_scitype(x, Scitype::Series, Scitype::Series),
                Some(x)
            );
        }
    }

    #[test]
    fn expected_scitype_primitives_yields_table() {
        for x in [Scitype::Series, Scitype::Panel, Scitype::Hierarchical] {
            assert_eq!(
                expected_transform_output_scitype(x, Scitype::Series, Scitype::Primitives),
                Some(Scitype::Table)
            );
        }
    }

    #[test]
    fn expected_scitype_panel_output_promotes() {
        assert_eq!(
            expected_transform_output_scitype(Scitype::Series, Scitype::Series, Scitype::Panel),
            Some(Scitype::Panel)
        );
        assert_eq!(
            expected_transform_output_scitype(Scitype::Panel, Scitype::Series, Scitype::Panel),
            Some(Scitype::Hierarchical)
        );
        assert_eq!(
            expected_transform_output_scitype(
                Scitype::Hierarchical,
                Scitype::Series,
                Scitype::Panel
            ),
            Some(Scitype::Hierarchical)
        );
    }

    #[test]
    fn almost_equal_respects_decimal_tolerance() {
        let a = Array2::from_shape_vec((1, 2), vec![0.501, 0.499]).unwrap();
        let b = Array2::from_shape_vec((1, 2), vec![0.50, 0.50]).unwrap();
        assert!(assert_array_almost_equal(&a, &b, 2).is_ok());
        assert!(assert_array_almost_equal(&a, &b, 4).is_err());
    }
}
