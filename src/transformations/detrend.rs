//! Linear detrending of univariate series.

use crate::data::{Data, Hierarchical, Panel, Scitype, Series};
use crate::error::{EstimatorError, Result};
use crate::estimators::{check_transformer_input, Estimator, Transformer};
use crate::tags::{
    Tags, CAPABILITY_INVERSE_TRANSFORM, SAME_TIME_INDEX, TRANSFORM_INPUT_SCITYPE,
    TRANSFORM_OUTPUT_SCITYPE,
};

/// Least-squares line fit over timepoint positions: (intercept, slope).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trend {
    intercept: f64,
    slope: f64,
}

impl Trend {
    fn fit(series: &Series) -> Trend {
        let n = series.n_timepoints();
        if n < 2 {
            let intercept = if n == 1 { series.values()[(0, 0)] } else { 0.0 };
            return Trend { intercept, slope: 0.0 };
        }
        let n_f = n as f64;
        let t_mean = (n_f - 1.0) / 2.0;
        let y_mean = (0..n).map(|t| series.values()[(t, 0)]).sum::<f64>() / n_f;

        let mut cov = 0.0;
        let mut var = 0.0;
        for t in 0..n {
            let dt = t as f64 - t_mean;
            cov += dt * (series.values()[(t, 0)] - y_mean);
            var += dt * dt;
        }
        let slope = cov / var;
        Trend {
            intercept: y_mean - slope * t_mean,
            slope,
        }
    }

    fn at(&self, t: usize) -> f64 {
        self.intercept + self.slope * t as f64
    }
}

/// Fitted trend lines, one per series instance in traversal order.
#[derive(Debug, Clone)]
enum FittedTrends {
    Series(Trend),
    Panel(Vec<Trend>),
    Hierarchical(Vec<Vec<Trend>>),
}

/// Removes a per-instance linear trend, fitted in `fit` by least squares.
///
/// Univariate only: multivariate input is rejected in `fit`. The trend is
/// stored per instance, so `transform` and `inverse_transform` expect data
/// with the same instance structure the transformer was fitted on.
#[derive(Default)]
pub struct Detrender {
    fitted: Option<FittedTrends>,
}

impl Detrender {
    pub fn new() -> Self {
        Detrender::default()
    }

    pub fn create_test_instance() -> Self {
        Detrender::new()
    }

    fn fitted(&self) -> Result<&FittedTrends> {
        self.fitted
            .as_ref()
            .ok_or(EstimatorError::NotFitted("Detrender"))
    }

    /// Apply `sign * trend` to every value: -1 detrends, +1 restores.
    fn apply(&self, x: &Data, sign: f64) -> Result<Data> {
        let fitted = self.fitted()?;
        let adjust = |series: &Series, trend: &Trend| -> Series {
            let mut values = series.values().clone();
            for t in 0..series.n_timepoints() {
                values[(t, 0)] += sign * trend.at(t);
            }
            Series::new(series.index().to_vec(), values)
        };

        match (x, fitted) {
            (Data::Series(s), FittedTrends::Series(trend)) => Ok(Data::Series(adjust(s, trend))),
            (Data::Panel(p), FittedTrends::Panel(trends)) => {
                if p.n_instances() != trends.len() {
                    return Err(EstimatorError::InvalidInput(format!(
                        "X has {} instances but Detrender was fitted on {}",
                        p.n_instances(),
                        trends.len()
                    )));
                }
                Ok(Data::Panel(Panel::new(
                    p.instances()
                        .iter()
                        .zip(trends.iter())
                        .map(|(s, trend)| adjust(s, trend))
                        .collect(),
                )))
            }
            (Data::Hierarchical(h), FittedTrends::Hierarchical(trends)) => {
                if h.n_panels() != trends.len() {
                    return Err(EstimatorError::InvalidInput(format!(
                        "X has {} panels but Detrender was fitted on {}",
                        h.n_panels(),
                        trends.len()
                    )));
                }
                let panels = h
                    .panels()
                    .iter()
                    .zip(trends.iter())
                    .map(|(panel, panel_trends)| {
                        Panel::new(
                            panel
                                .instances()
                                .iter()
                                .zip(panel_trends.iter())
                                .map(|(s, trend)| adjust(s, trend))
                                .collect(),
                        )
                    })
                    .collect();
                Ok(Data::Hierarchical(Hierarchical::new(panels)))
            }
            _ => Err(EstimatorError::InvalidInput(
                "X scitype does not match the data Detrender was fitted on".to_string(),
            )),
        }
    }
}

impl Estimator for Detrender {
    fn name(&self) -> &'static str {
        "Detrender"
    }

    fn tags(&self) -> Tags {
        Tags::new()
            .with_bool(CAPABILITY_INVERSE_TRANSFORM, true)
            .with_bool(SAME_TIME_INDEX, true)
            .with_scitype(TRANSFORM_INPUT_SCITYPE, Scitype::Series)
            .with_scitype(TRANSFORM_OUTPUT_SCITYPE, Scitype::Series)
    }
}

impl Transformer for Detrender {
    fn fit(&mut self, x: &Data) -> Result<()> {
        check_transformer_input(x, &self.tags())?;
        self.fitted = Some(match x {
            Data::Series(s) => FittedTrends::Series(Trend::fit(s)),
            Data::Panel(p) => {
                FittedTrends::Panel(p.instances().iter().map(Trend::fit).collect())
            }
            Data::Hierarchical(h) => FittedTrends::Hierarchical(
                h.panels()
                    .iter()
                    .map(|p| p.instances().iter().map(Trend::fit).collect())
                    .collect(),
            ),
            Data::Table(_) => {
                return Err(EstimatorError::InvalidInput(
                    "Detrender requires Series, Panel or Hierarchical input".to_string(),
                ))
            }
        });
        Ok(())
    }

    fn transform(&self, x: &Data) -> Result<Data> {
        self.apply(x, -1.0)
    }

    fn inverse_transform(&self, x: &Data) -> Result<Data> {
        self.apply(x, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_exact_linear_trend() {
        // y = 2 + 3t has residual zero everywhere after detrending.
        let s = Series::from_vec((0..6).map(|t| 2.0 + 3.0 * t as f64).collect());
        let x = Data::Series(s);

        let mut d = Detrender::new();
        d.fit(&x).unwrap();
        let xt = d.transform(&x).unwrap();

        for t in 0..6 {
            let v = xt.as_series().unwrap().values()[(t, 0)];
            assert!(v.abs() < 1e-9, "residual at {} is {}", t, v);
        }
    }

    #[test]
    fn inverse_restores_original() {
        let s = Series::from_vec(vec![1.0, 4.0, 2.0, 8.0, 5.0]);
        let x = Data::Series(s.clone());

        let mut d = Detrender::new();
        d.fit(&x).unwrap();
        let xt = d.transform(&x).unwrap();
        let xit = d.inverse_transform(&xt).unwrap();

        let back = xit.as_series().unwrap();
        for t in 0..5 {
            assert!(
                (back.values()[(t, 0)] - s.values()[(t, 0)]).abs() < 1e-9,
                "value at {} not restored",
                t
            );
        }
    }

    #[test]
    fn multivariate_fit_raises_univariate_error() {
        let values = ndarray::Array2::from_shape_vec((3, 2), vec![0.0; 6]).unwrap();
        let x = Data::Series(Series::new(vec![0, 1, 2], values));

        let err = Detrender::new().fit(&x).unwrap_err();
        assert!(err.to_string().contains("univariate"), "msg: {}", err);
    }
}
