//! Data containers and their scitype classification.
//!
//! A *scitype* is the logical shape of a data container: a single `Series`,
//! a `Panel` of series instances, a `Hierarchical` collection of panels, a
//! flat `Table` of primitives, or bare `Primitives`. Every object passed
//! between fit/predict/transform validates against exactly one scitype, and
//! estimators declare the scitypes they consume and produce via tags.

use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Logical shape classification of a data container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Scitype {
    Series,
    Panel,
    Hierarchical,
    Table,
    Primitives,
}

impl Scitype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scitype::Series => "Series",
            Scitype::Panel => "Panel",
            Scitype::Hierarchical => "Hierarchical",
            Scitype::Table => "Table",
            Scitype::Primitives => "Primitives",
        }
    }
}

impl FromStr for Scitype {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Series" => Ok(Scitype::Series),
            "Panel" => Ok(Scitype::Panel),
            "Hierarchical" => Ok(Scitype::Hierarchical),
            "Table" => Ok(Scitype::Table),
            "Primitives" => Ok(Scitype::Primitives),
            other => Err(format!("Unknown scitype: {}", other)),
        }
    }
}

/// A single time series: a time index and one value column per channel.
///
/// `values` is (n_timepoints, n_channels); univariate series have one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index: Vec<i64>,
    values: Array2<f64>,
}

impl Series {
    pub fn new(index: Vec<i64>, values: Array2<f64>) -> Self {
        assert_eq!(
            index.len(),
            values.nrows(),
            "time index length must match number of value rows"
        );
        Series { index, values }
    }

    /// Univariate series over a default 0..n index.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let n = values.len();
        let values = Array2::from_shape_vec((n, 1), values)
            .expect("from_vec: shape is (len, 1) by construction");
        Series {
            index: (0..n as i64).collect(),
            values,
        }
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_timepoints(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_channels(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_univariate(&self) -> bool {
        self.n_channels() == 1
    }

    /// Channel column as a flat array.
    pub fn channel(&self, c: usize) -> Array1<f64> {
        self.values.column(c).to_owned()
    }

    /// Elementwise map over values, keeping the time index.
    pub fn mapv<F>(&self, f: F) -> Series
    where
        F: Fn(f64) -> f64,
    {
        Series {
            index: self.index.clone(),
            values: self.values.mapv(f),
        }
    }

    /// Restrict the series to the rows whose index appears in `index`,
    /// in the order given. Panics if an index value is absent.
    pub fn select_index(&self, index: &[i64]) -> Series {
        let rows: Vec<usize> = index
            .iter()
            .map(|t| {
                self.index
                    .iter()
                    .position(|own| own == t)
                    .expect("select_index: index value not present in series")
            })
            .collect();
        let mut values = Array2::zeros((rows.len(), self.n_channels()));
        for (out_row, &src_row) in rows.iter().enumerate() {
            for c in 0..self.n_channels() {
                values[(out_row, c)] = self.values[(src_row, c)];
            }
        }
        Series {
            index: index.to_vec(),
            values,
        }
    }
}

/// A collection of time-series instances, one per row of an associated `y`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    instances: Vec<Series>,
}

impl Panel {
    pub fn new(instances: Vec<Series>) -> Self {
        Panel { instances }
    }

    pub fn instances(&self) -> &[Series] {
        &self.instances
    }

    pub fn n_instances(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn is_univariate(&self) -> bool {
        self.instances.iter().all(Series::is_univariate)
    }

    /// Maximum channel count over all instances.
    pub fn n_channels(&self) -> usize {
        self.instances
            .iter()
            .map(Series::n_channels)
            .max()
            .unwrap_or(0)
    }

    pub fn map_instances<F>(&self, f: F) -> Panel
    where
        F: Fn(&Series) -> Series,
    {
        Panel {
            instances: self.instances.iter().map(f).collect(),
        }
    }

    pub fn select(&self, indices: &[usize]) -> Panel {
        Panel {
            instances: indices.iter().map(|&i| self.instances[i].clone()).collect(),
        }
    }
}

/// A two-level collection: panels of series instances.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hierarchical {
    panels: Vec<Panel>,
}

impl Hierarchical {
    pub fn new(panels: Vec<Panel>) -> Self {
        Hierarchical { panels }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn n_panels(&self) -> usize {
        self.panels.len()
    }

    /// Total instance count across all panels.
    pub fn n_instances(&self) -> usize {
        self.panels.iter().map(Panel::n_instances).sum()
    }

    pub fn is_univariate(&self) -> bool {
        self.panels.iter().all(Panel::is_univariate)
    }
}

/// A flat table of primitive values with named columns, one row per instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    column_names: Vec<String>,
    rows: Array2<f64>,
}

impl Table {
    pub fn new(column_names: Vec<String>, rows: Array2<f64>) -> Self {
        assert_eq!(
            column_names.len(),
            rows.ncols(),
            "column name count must match table width"
        );
        Table { column_names, rows }
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.nrows()
    }
}

/// A data container of any scitype, as passed through transform pipelines.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Series(Series),
    Panel(Panel),
    Hierarchical(Hierarchical),
    Table(Table),
}

impl Data {
    pub fn scitype(&self) -> Scitype {
        match self {
            Data::Series(_) => Scitype::Series,
            Data::Panel(_) => Scitype::Panel,
            Data::Hierarchical(_) => Scitype::Hierarchical,
            Data::Table(_) => Scitype::Table,
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Data::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_panel(&self) -> Option<&Panel> {
        match self {
            Data::Panel(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hierarchical(&self) -> Option<&Hierarchical> {
        match self {
            Data::Hierarchical(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Data::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_univariate(&self) -> bool {
        match self {
            Data::Series(s) => s.is_univariate(),
            Data::Panel(p) => p.is_univariate(),
            Data::Hierarchical(h) => h.is_univariate(),
            Data::Table(_) => true,
        }
    }
}

/// Shape metadata reported by [`check_is_scitype`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScitypeMetadata {
    pub n_instances: usize,
    pub n_panels: usize,
    pub is_univariate: bool,
}

/// Check whether `data` validates against `scitype`.
///
/// Returns the validation outcome, a human-readable message on mismatch,
/// and shape metadata for the container's actual scitype.
pub fn check_is_scitype(data: &Data, scitype: Scitype) -> (bool, String, ScitypeMetadata) {
    let actual = data.scitype();
    let metadata = ScitypeMetadata {
        n_instances: match data {
            Data::Series(_) => 1,
            Data::Panel(p) => p.n_instances(),
            Data::Hierarchical(h) => h.n_instances(),
            Data::Table(t) => t.n_rows(),
        },
        n_panels: match data {
            Data::Hierarchical(h) => h.n_panels(),
            _ => 0,
        },
        is_univariate: data.is_univariate(),
    };

    // Table is the container scitype realizing Primitives output.
    let valid = actual == scitype || (scitype == Scitype::Primitives && actual == Scitype::Table);
    let message = if valid {
        String::new()
    } else {
        format!(
            "expected scitype {}, found {}",
            scitype.as_str(),
            actual.as_str()
        )
    };
    (valid, message, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_from_vec_is_univariate() {
        let s = Series::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.n_timepoints(), 3);
        assert!(s.is_univariate());
        assert_eq!(s.index(), &[0, 1, 2]);
    }

    #[test]
    fn check_is_scitype_classifies_panel() {
        let panel = Panel::new(vec![Series::from_vec(vec![0.0; 4]); 3]);
        let data = Data::Panel(panel);

        let (valid, msg, meta) = check_is_scitype(&data, Scitype::Panel);
        assert!(valid, "panel should validate as Panel: {}", msg);
        assert_eq!(meta.n_instances, 3);

        let (valid, msg, _) = check_is_scitype(&data, Scitype::Series);
        assert!(!valid);
        assert!(msg.contains("expected scitype Series"), "msg = {}", msg);
    }

    #[test]
    fn table_validates_as_primitives() {
        let table = Table::new(
            vec!["mean".to_string()],
            Array2::from_shape_vec((2, 1), vec![0.5, 1.5]).unwrap(),
        );
        let (valid, _, meta) = check_is_scitype(&Data::Table(table), Scitype::Primitives);
        assert!(valid);
        assert_eq!(meta.n_instances, 2);
    }

    #[test]
    fn select_index_restricts_rows() {
        let s = Series::from_vec(vec![10.0, 20.0, 30.0, 40.0]);
        let sub = s.select_index(&[1, 3]);
        assert_eq!(sub.n_timepoints(), 2);
        assert_eq!(sub.values()[(0, 0)], 20.0);
        assert_eq!(sub.values()[(1, 0)], 40.0);
    }
}
