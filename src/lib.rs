//! seriate: time-series classifiers and transformers with a built-in
//! conformance-checking harness.
//!
//! This crate provides lightweight estimator implementations (k-NN and
//! nearest-centroid classifiers, power/detrend/segment/summary
//! transformers), pipeline composition via the `*` operator, embedded
//! reference datasets, and the conformance machinery (fixture registry,
//! scenarios, checks) that the integration test suites are built on.
//!
//! The design favors small, testable modules: estimators declare their
//! capabilities through string-keyed tags, data containers carry a scitype
//! classification, and every shipped estimator is exercised by the generic
//! conformance checks in `conformance`.

pub mod classifiers;
pub mod compose;
pub mod conformance;
pub mod data;
pub mod datasets;
pub mod error;
pub mod estimators;
pub mod tags;
pub mod transformations;
