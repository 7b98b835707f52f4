//! String-keyed capability tags attached to estimators.
//!
//! Tags declare what an estimator can do (multivariate input, inverse
//! transform) and how its transform maps scitypes. Conformance checks read
//! tags before deciding which assertions apply; estimators never read their
//! own tags at runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::Scitype;

/// Estimator accepts multivariate (multi-channel) input.
pub const CAPABILITY_MULTIVARIATE: &str = "capability:multivariate";
/// Transformer implements `inverse_transform`.
pub const CAPABILITY_INVERSE_TRANSFORM: &str = "capability:inverse_transform";
/// Scitype of the "instance" a transformer consumes.
pub const TRANSFORM_INPUT_SCITYPE: &str = "scitype:transform-input";
/// Scitype that instance is transformed to.
pub const TRANSFORM_OUTPUT_SCITYPE: &str = "scitype:transform-output";
/// Transform output keeps the time index (and thus sample counts) of its input.
pub const SAME_TIME_INDEX: &str = "transform-returns-same-time-index";
/// Transformer defers all fitting to `transform`; `fit` is a no-op.
pub const FIT_IN_TRANSFORM: &str = "fit_in_transform";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Str(String),
}

/// An estimator's tag mapping. Absent boolean tags read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    entries: HashMap<String, TagValue>,
}

impl Tags {
    pub fn new() -> Self {
        Tags::default()
    }

    pub fn with_bool(mut self, key: &str, value: bool) -> Self {
        self.entries.insert(key.to_string(), TagValue::Bool(value));
        self
    }

    pub fn with_str(mut self, key: &str, value: &str) -> Self {
        self.entries
            .insert(key.to_string(), TagValue::Str(value.to_string()));
        self
    }

    pub fn with_scitype(self, key: &str, value: Scitype) -> Self {
        self.with_str(key, value.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.entries.get(key)
    }

    /// Boolean tag lookup; missing keys default to `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(TagValue::Bool(true)))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(TagValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Scitype-valued tag lookup, e.g. for `scitype:transform-input`.
    pub fn get_scitype(&self, key: &str) -> Option<Scitype> {
        self.get_str(key).and_then(|s| s.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bool_tag_defaults_to_false() {
        let tags = Tags::new().with_bool(CAPABILITY_INVERSE_TRANSFORM, true);
        assert!(tags.get_bool(CAPABILITY_INVERSE_TRANSFORM));
        assert!(!tags.get_bool(CAPABILITY_MULTIVARIATE));
    }

    #[test]
    fn scitype_tags_round_trip() {
        let tags = Tags::new().with_scitype(TRANSFORM_INPUT_SCITYPE, Scitype::Series);
        assert_eq!(tags.get_scitype(TRANSFORM_INPUT_SCITYPE), Some(Scitype::Series));
        assert_eq!(tags.get_scitype(TRANSFORM_OUTPUT_SCITYPE), None);
    }
}
