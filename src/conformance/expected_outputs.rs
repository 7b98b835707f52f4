//! Stored reference probability tables for golden-value regression checks.
//!
//! Tables are keyed by classifier name and correspond to fitting on the
//! named dataset's training split (seed 0) and predicting probabilities on
//! its ten-instance test split. Classifiers without a registered table are
//! skipped by the golden regression test.
//!
//! The unit-test dataset has classes ("1", "2") alternating over the test
//! split; basic-motions has four classes cycling in sorted label order.
//! With well-separated classes, 1-NN yields one-hot probability rows.

use ndarray::Array2;

/// Reference `predict_proba` on the unit-test dataset, or `None` if no
/// table is registered for the classifier.
pub fn unit_test_proba(classifier_name: &str) -> Option<Array2<f64>> {
    match classifier_name {
        "KNeighborsTimeSeriesClassifier" => Some(
            Array2::from_shape_vec(
                (10, 2),
                vec![
                    1.0, 0.0, //
                    0.0, 1.0, //
                    1.0, 0.0, //
                    0.0, 1.0, //
                    1.0, 0.0, //
                    0.0, 1.0, //
                    1.0, 0.0, //
                    0.0, 1.0, //
                    1.0, 0.0, //
                    0.0, 1.0,
                ],
            )
            .expect("reference table is 10x2"),
        ),
        _ => None,
    }
}

/// Reference `predict_proba` on the basic-motions dataset, or `None` if no
/// table is registered for the classifier.
pub fn basic_motions_proba(classifier_name: &str) -> Option<Array2<f64>> {
    match classifier_name {
        "KNeighborsTimeSeriesClassifier" => Some(
            Array2::from_shape_vec(
                (10, 4),
                vec![
                    1.0, 0.0, 0.0, 0.0, //
                    0.0, 1.0, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, //
                    0.0, 1.0, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, //
                    0.0, 1.0, 0.0, 0.0,
                ],
            )
            .expect("reference table is 10x4"),
        ),
        _ => None,
    }
}
