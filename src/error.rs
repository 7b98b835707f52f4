use std::error::Error;
use std::fmt;

/// Errors raised by estimators during their lifecycle methods.
///
/// `InvalidInput` is the one error class conformance checks expect and match
/// on; everything else signals a broken estimator or harness and propagates.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatorError {
    /// Input validation failed (wrong arity, wrong scitype, bad shape).
    InvalidInput(String),
    /// A predict/transform method was called before `fit`.
    NotFitted(&'static str),
    /// The estimator does not implement the requested method.
    Unsupported(&'static str),
}

impl fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EstimatorError::InvalidInput(msg) => write!(f, "{}", msg),
            EstimatorError::NotFitted(name) => {
                write!(f, "{} must be fitted before calling predict or transform", name)
            }
            EstimatorError::Unsupported(method) => {
                write!(f, "estimator does not implement {}", method)
            }
        }
    }
}

impl Error for EstimatorError {}

pub type Result<T> = std::result::Result<T, EstimatorError>;
