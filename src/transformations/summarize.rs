//! Summary statistics per instance: a Series→Primitives transformer.

use ndarray::Array2;

use crate::data::{Data, Scitype, Table};
use crate::error::Result;
use crate::estimators::{Estimator, Transformer};
use crate::tags::{
    Tags, CAPABILITY_MULTIVARIATE, FIT_IN_TRANSFORM, TRANSFORM_INPUT_SCITYPE,
    TRANSFORM_OUTPUT_SCITYPE,
};

use super::collect_series;

/// Reduces every series instance to (mean, std, min, max) over all of its
/// values, pooled across channels. Output is a `Table` with one row per
/// instance, realizing the any→Primitives scitype rule.
#[derive(Default)]
pub struct SummaryTransformer;

impl SummaryTransformer {
    pub fn new() -> Self {
        SummaryTransformer
    }

    pub fn create_test_instance() -> Self {
        SummaryTransformer
    }
}

impl Estimator for SummaryTransformer {
    fn name(&self) -> &'static str {
        "SummaryTransformer"
    }

    fn tags(&self) -> Tags {
        Tags::new()
            .with_bool(CAPABILITY_MULTIVARIATE, true)
            .with_bool(FIT_IN_TRANSFORM, true)
            .with_scitype(TRANSFORM_INPUT_SCITYPE, Scitype::Series)
            .with_scitype(TRANSFORM_OUTPUT_SCITYPE, Scitype::Primitives)
    }
}

impl Transformer for SummaryTransformer {
    fn fit(&mut self, _x: &Data) -> Result<()> {
        Ok(())
    }

    fn transform(&self, x: &Data) -> Result<Data> {
        let instances = collect_series(x);
        let mut rows = Vec::with_capacity(instances.len() * 4);
        for series in &instances {
            let values: Vec<f64> = series.values().iter().copied().collect();
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            rows.extend_from_slice(&[mean, var.sqrt(), min, max]);
        }

        let table = Table::new(
            ["mean", "std", "min", "max"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Array2::from_shape_vec((instances.len(), 4), rows)
                .expect("summary rows have 4 columns by construction"),
        );
        Ok(Data::Table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Panel, Series};

    #[test]
    fn panel_reduces_to_one_row_per_instance() {
        let panel = Panel::new(vec![
            Series::from_vec(vec![1.0, 2.0, 3.0]),
            Series::from_vec(vec![10.0, 10.0, 10.0]),
        ]);
        let t = SummaryTransformer::new();

        let out = t.transform(&Data::Panel(panel)).unwrap();
        let table = out.as_table().expect("output should be a Table");
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column_names(), &["mean", "std", "min", "max"]);
        assert!((table.rows()[(0, 0)] - 2.0).abs() < 1e-12);
        assert_eq!(table.rows()[(1, 1)], 0.0);
        assert_eq!(table.rows()[(0, 2)], 1.0);
        assert_eq!(table.rows()[(0, 3)], 3.0);
    }

    #[test]
    fn series_yields_single_row_table() {
        let t = SummaryTransformer::new();
        let out = t
            .transform(&Data::Series(Series::from_vec(vec![4.0, 6.0])))
            .unwrap();
        assert_eq!(out.as_table().unwrap().n_rows(), 1);
    }
}
