//! Elementwise power transform.

use serde::{Deserialize, Serialize};

use crate::data::Data;
use crate::error::Result;
use crate::estimators::{Estimator, Transformer};
use crate::tags::{
    Tags, CAPABILITY_INVERSE_TRANSFORM, CAPABILITY_MULTIVARIATE, FIT_IN_TRANSFORM,
    SAME_TIME_INDEX, TRANSFORM_INPUT_SCITYPE, TRANSFORM_OUTPUT_SCITYPE,
};
use crate::data::Scitype;

use super::map_series;

/// Hyper-parameters for [`ExponentTransformer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExponentConfig {
    pub power: f64,
}

impl Default for ExponentConfig {
    fn default() -> Self {
        ExponentConfig { power: 0.5 }
    }
}

/// Raises every value to a fixed power, preserving sign:
/// `x ↦ sign(x) * |x|^power`.
///
/// Stateless (fit is a no-op) and exactly invertible via the reciprocal
/// power, so both `fit_in_transform` and `capability:inverse_transform`
/// are set. The time index passes through untouched.
pub struct ExponentTransformer {
    config: ExponentConfig,
}

impl ExponentTransformer {
    pub fn new(power: f64) -> Self {
        assert!(power != 0.0, "power must be non-zero to be invertible");
        ExponentTransformer {
            config: ExponentConfig { power },
        }
    }

    pub fn create_test_instance() -> Self {
        Self::new(ExponentConfig::default().power)
    }

    fn apply(&self, data: &Data, power: f64) -> Data {
        map_series(data, |s| {
            s.mapv(|v| v.signum() * v.abs().powf(power))
        })
    }
}

impl Estimator for ExponentTransformer {
    fn name(&self) -> &'static str {
        "ExponentTransformer"
    }

    fn tags(&self) -> Tags {
        Tags::new()
            .with_bool(CAPABILITY_MULTIVARIATE, true)
            .with_bool(CAPABILITY_INVERSE_TRANSFORM, true)
            .with_bool(SAME_TIME_INDEX, true)
            .with_bool(FIT_IN_TRANSFORM, true)
            .with_scitype(TRANSFORM_INPUT_SCITYPE, Scitype::Series)
            .with_scitype(TRANSFORM_OUTPUT_SCITYPE, Scitype::Series)
    }
}

impl Transformer for ExponentTransformer {
    fn fit(&mut self, _x: &Data) -> Result<()> {
        // Stateless; all work happens in transform.
        Ok(())
    }

    fn transform(&self, x: &Data) -> Result<Data> {
        Ok(self.apply(x, self.config.power))
    }

    fn inverse_transform(&self, x: &Data) -> Result<Data> {
        Ok(self.apply(x, 1.0 / self.config.power))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Series;

    #[test]
    fn power_and_reciprocal_round_trip() {
        let t = ExponentTransformer::new(4.0);
        let x = Data::Series(Series::from_vec(vec![0.5, 1.0, 2.0, 3.0]));

        let xt = t.transform(&x).unwrap();
        let xit = t.inverse_transform(&xt).unwrap();

        let orig = x.as_series().unwrap();
        let back = xit.as_series().unwrap();
        for i in 0..orig.n_timepoints() {
            let a = orig.values()[(i, 0)];
            let b = back.values()[(i, 0)];
            assert!((a - b).abs() < 1e-9, "round trip at {}: {} vs {}", i, a, b);
        }
    }

    #[test]
    fn sign_preserved_for_negative_values() {
        let t = ExponentTransformer::new(2.0);
        let x = Data::Series(Series::from_vec(vec![-3.0]));
        let xt = t.transform(&x).unwrap();
        assert_eq!(xt.as_series().unwrap().values()[(0, 0)], -9.0);
    }
}
