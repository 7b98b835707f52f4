//! Conformance-checking harness: fixture registry, scenarios, and checks.
//!
//! The registry enumerates every estimator shipped by the crate, by kind,
//! as (name, constructor) pairs. Test suites iterate the registry, retrieve
//! the applicable scenarios, and run the checks; a new estimator joins the
//! suites by adding one registry entry.

pub mod checks;
pub mod expected_outputs;
pub mod scenarios;

use crate::classifiers::{KNeighborsTimeSeriesClassifier, NearestCentroidClassifier};
use crate::estimators::{Classifier, Transformer};
use crate::transformations::{
    Detrender, ExponentTransformer, SlidingWindowSegmenter, SummaryTransformer,
};

/// A registered classifier fixture.
pub struct ClassifierEntry {
    pub name: &'static str,
    pub build: fn() -> Box<dyn Classifier>,
}

/// A registered transformer fixture.
pub struct TransformerEntry {
    pub name: &'static str,
    pub build: fn() -> Box<dyn Transformer>,
}

/// All classifiers under conformance testing.
pub fn all_classifiers() -> Vec<ClassifierEntry> {
    vec![
        ClassifierEntry {
            name: "KNeighborsTimeSeriesClassifier",
            build: || Box::new(KNeighborsTimeSeriesClassifier::create_test_instance()),
        },
        ClassifierEntry {
            name: "NearestCentroidClassifier",
            build: || Box::new(NearestCentroidClassifier::create_test_instance()),
        },
    ]
}

/// All transformers under conformance testing.
pub fn all_transformers() -> Vec<TransformerEntry> {
    vec![
        TransformerEntry {
            name: "ExponentTransformer",
            build: || Box::new(ExponentTransformer::create_test_instance()),
        },
        TransformerEntry {
            name: "Detrender",
            build: || Box::new(Detrender::create_test_instance()),
        },
        TransformerEntry {
            name: "SlidingWindowSegmenter",
            build: || Box::new(SlidingWindowSegmenter::create_test_instance()),
        },
        TransformerEntry {
            name: "SummaryTransformer",
            build: || Box::new(SummaryTransformer::create_test_instance()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::Estimator;

    #[test]
    fn registry_names_match_estimators() {
        for entry in all_classifiers() {
            assert_eq!((entry.build)().name(), entry.name);
        }
        for entry in all_transformers() {
            assert_eq!((entry.build)().name(), entry.name);
        }
    }
}
