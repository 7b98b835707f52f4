//! Conformance tests common to all classifiers.

use seriate::conformance::checks::{
    check_classifier_output, check_golden_proba, check_multivariate_input_exception,
};
use seriate::conformance::expected_outputs::{basic_motions_proba, unit_test_proba};
use seriate::conformance::{all_classifiers, scenarios};
use seriate::datasets::{load_basic_motions, load_unit_test, Split};
use seriate::estimators::Estimator;
use seriate::tags::CAPABILITY_MULTIVARIATE;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// Multivariate input handling
// ---------------------------------------------------------------------------

#[test]
fn test_multivariate_input_exception() {
    init_logging();
    for entry in all_classifiers() {
        check_multivariate_input_exception(entry.build)
            .unwrap_or_else(|e| panic!("{}: {:#}", entry.name, e));
    }
}

// ---------------------------------------------------------------------------
// Output shape and probability normalization
// ---------------------------------------------------------------------------

#[test]
fn test_classifier_output() {
    init_logging();
    for entry in all_classifiers() {
        for scenario in scenarios::retrieve_classifier_scenarios() {
            let mut estimator = (entry.build)();
            // multivariate scenarios only apply to capable classifiers
            if scenario.multivariate && !estimator.tags().get_bool(CAPABILITY_MULTIVARIATE) {
                continue;
            }
            check_classifier_output(estimator.as_mut(), &scenario).unwrap_or_else(|e| {
                panic!("{} on scenario {}: {:#}", entry.name, scenario.name, e)
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Golden-value regression on the named datasets
// ---------------------------------------------------------------------------

#[test]
fn test_classifier_on_unit_test_data() {
    init_logging();
    let (x_train, y_train) = load_unit_test(Split::Train).expect("unit_test train split loads");
    let (x_test, _) = load_unit_test(Split::Test).expect("unit_test test split loads");

    for entry in all_classifiers() {
        // skip classifiers without a registered reference table
        let Some(expected) = unit_test_proba(entry.name) else {
            continue;
        };
        let mut estimator = (entry.build)();
        check_golden_proba(estimator.as_mut(), &x_train, &y_train, &x_test, &expected, 2)
            .unwrap_or_else(|e| panic!("{}: {:#}", entry.name, e));
    }
}

#[test]
fn test_classifier_on_basic_motions() {
    init_logging();
    let (x_train, y_train) =
        load_basic_motions(Split::Train).expect("basic_motions train split loads");
    let (x_test, _) = load_basic_motions(Split::Test).expect("basic_motions test split loads");

    for entry in all_classifiers() {
        let Some(expected) = basic_motions_proba(entry.name) else {
            continue;
        };
        let mut estimator = (entry.build)();
        check_golden_proba(estimator.as_mut(), &x_train, &y_train, &x_test, &expected, 2)
            .unwrap_or_else(|e| panic!("{}: {:#}", entry.name, e));
    }
}
