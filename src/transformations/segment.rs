//! Sliding-window segmentation: each series becomes a panel of subsequences.

use serde::{Deserialize, Serialize};

use crate::data::{Data, Hierarchical, Panel, Scitype, Series};
use crate::error::{EstimatorError, Result};
use crate::estimators::{check_transformer_input, Estimator, Transformer};
use crate::tags::{
    Tags, FIT_IN_TRANSFORM, TRANSFORM_INPUT_SCITYPE, TRANSFORM_OUTPUT_SCITYPE,
};

/// Hyper-parameters for [`SlidingWindowSegmenter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    pub window_len: usize,
    pub step: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        SegmenterConfig {
            window_len: 4,
            step: 2,
        }
    }
}

/// Cuts each univariate series into overlapping windows.
///
/// Scitype promotion follows the Series→Panel rule: a `Series` input yields
/// a `Panel` of windows, `Panel` and `Hierarchical` inputs yield a
/// `Hierarchical` container with one panel of windows per original instance.
///
/// Stateless, so fitting folds into `transform`; input validation (the
/// univariate requirement) therefore also surfaces in `transform`.
pub struct SlidingWindowSegmenter {
    config: SegmenterConfig,
}

impl SlidingWindowSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        assert!(config.window_len > 0, "window length must be positive");
        assert!(config.step > 0, "step must be positive");
        SlidingWindowSegmenter { config }
    }

    pub fn create_test_instance() -> Self {
        Self::new(SegmenterConfig::default())
    }

    fn segment(&self, series: &Series) -> Result<Panel> {
        let n = series.n_timepoints();
        if n < self.config.window_len {
            return Err(EstimatorError::InvalidInput(format!(
                "window length {} exceeds series length {}",
                self.config.window_len, n
            )));
        }
        let mut windows = Vec::new();
        let mut start = 0;
        while start + self.config.window_len <= n {
            let window: Vec<f64> = (start..start + self.config.window_len)
                .map(|t| series.values()[(t, 0)])
                .collect();
            windows.push(Series::from_vec(window));
            start += self.config.step;
        }
        Ok(Panel::new(windows))
    }
}

impl Estimator for SlidingWindowSegmenter {
    fn name(&self) -> &'static str {
        "SlidingWindowSegmenter"
    }

    fn tags(&self) -> Tags {
        Tags::new()
            .with_bool(FIT_IN_TRANSFORM, true)
            .with_scitype(TRANSFORM_INPUT_SCITYPE, Scitype::Series)
            .with_scitype(TRANSFORM_OUTPUT_SCITYPE, Scitype::Panel)
    }
}

impl Transformer for SlidingWindowSegmenter {
    fn fit(&mut self, _x: &Data) -> Result<()> {
        // Stateless; validation happens in transform.
        Ok(())
    }

    fn transform(&self, x: &Data) -> Result<Data> {
        check_transformer_input(x, &self.tags())?;
        match x {
            Data::Series(s) => Ok(Data::Panel(self.segment(s)?)),
            Data::Panel(p) => {
                let panels: Result<Vec<Panel>> =
                    p.instances().iter().map(|s| self.segment(s)).collect();
                Ok(Data::Hierarchical(Hierarchical::new(panels?)))
            }
            Data::Hierarchical(h) => {
                let panels: Result<Vec<Panel>> = h
                    .panels()
                    .iter()
                    .flat_map(|p| p.instances().iter())
                    .map(|s| self.segment(s))
                    .collect();
                Ok(Data::Hierarchical(Hierarchical::new(panels?)))
            }
            Data::Table(_) => Err(EstimatorError::InvalidInput(
                "SlidingWindowSegmenter requires Series, Panel or Hierarchical input".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_becomes_panel_of_windows() {
        let s = Series::from_vec((0..8).map(|t| t as f64).collect());
        let seg = SlidingWindowSegmenter::create_test_instance();

        let out = seg.transform(&Data::Series(s)).unwrap();
        let panel = out.as_panel().expect("Series input should yield Panel");
        // windows starting at 0, 2, 4 with len 4
        assert_eq!(panel.n_instances(), 3);
        assert_eq!(panel.instances()[1].values()[(0, 0)], 2.0);
    }

    #[test]
    fn panel_promotes_to_hierarchical() {
        let panel = Panel::new(vec![
            Series::from_vec((0..8).map(|t| t as f64).collect()),
            Series::from_vec((0..8).map(|t| t as f64 + 1.0).collect()),
        ]);
        let seg = SlidingWindowSegmenter::create_test_instance();

        let out = seg.transform(&Data::Panel(panel)).unwrap();
        let h = out
            .as_hierarchical()
            .expect("Panel input should yield Hierarchical");
        assert_eq!(h.n_panels(), 2);
    }

    #[test]
    fn multivariate_error_raised_in_transform() {
        let values = ndarray::Array2::from_shape_vec((6, 2), vec![0.0; 12]).unwrap();
        let x = Data::Series(Series::new((0..6).collect(), values));
        let mut seg = SlidingWindowSegmenter::create_test_instance();

        // fit is a no-op, the error surfaces in transform
        seg.fit(&x).unwrap();
        let err = seg.transform(&x).unwrap_err();
        assert!(err.to_string().contains("univariate"));
    }

    #[test]
    fn too_short_series_rejected() {
        let s = Series::from_vec(vec![1.0, 2.0]);
        let seg = SlidingWindowSegmenter::create_test_instance();
        assert!(seg.transform(&Data::Series(s)).is_err());
    }
}
