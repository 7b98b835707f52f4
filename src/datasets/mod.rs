//! Built-in datasets and synthetic panel generators.
//!
//! The two named datasets ship embedded as CSV and load deterministically:
//! `unit_test` (univariate, two classes) and `basic_motions` (six channels,
//! four classes). Both come with fixed train/test splits; the test splits
//! hold exactly ten instances and are the reference inputs for golden-value
//! regression checks.

use anyhow::{Context, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{Panel, Series};
use crate::estimators::ClassLabel;

const UNIT_TEST_TRAIN: &str = include_str!("data/unit_test_train.csv");
const UNIT_TEST_TEST: &str = include_str!("data/unit_test_test.csv");
const BASIC_MOTIONS_TRAIN: &str = include_str!("data/basic_motions_train.csv");
const BASIC_MOTIONS_TEST: &str = include_str!("data/basic_motions_test.csv");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Test,
}

/// Load the univariate two-class unit-test dataset.
pub fn load_unit_test(split: Split) -> Result<(Panel, Vec<ClassLabel>)> {
    let raw = match split {
        Split::Train => UNIT_TEST_TRAIN,
        Split::Test => UNIT_TEST_TEST,
    };
    parse_univariate_csv(raw).context("failed to parse unit_test dataset")
}

/// Load the six-channel four-class basic-motions dataset.
pub fn load_basic_motions(split: Split) -> Result<(Panel, Vec<ClassLabel>)> {
    let raw = match split {
        Split::Train => BASIC_MOTIONS_TRAIN,
        Split::Test => BASIC_MOTIONS_TEST,
    };
    parse_multivariate_csv(raw).context("failed to parse basic_motions dataset")
}

/// One record per instance: class label followed by the value columns.
fn parse_univariate_csv(raw: &str) -> Result<(Panel, Vec<ClassLabel>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(raw.as_bytes());

    let mut instances = Vec::new();
    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record?;
        let label = record
            .get(0)
            .context("record missing class column")?
            .to_string();
        let values: Vec<f64> = record
            .iter()
            .skip(1)
            .map(|field| field.parse::<f64>().context("non-numeric value field"))
            .collect::<Result<_>>()?;
        instances.push(Series::from_vec(values));
        labels.push(label);
    }
    Ok((Panel::new(instances), labels))
}

/// One record per (instance, channel); records for an instance are adjacent
/// and carry the same class label.
fn parse_multivariate_csv(raw: &str) -> Result<(Panel, Vec<ClassLabel>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(raw.as_bytes());

    // (instance id, label, channels in file order)
    let mut grouped: Vec<(usize, ClassLabel, Vec<Vec<f64>>)> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let instance: usize = record
            .get(0)
            .context("record missing instance column")?
            .parse()?;
        let label = record
            .get(2)
            .context("record missing class column")?
            .to_string();
        let values: Vec<f64> = record
            .iter()
            .skip(3)
            .map(|field| field.parse::<f64>().context("non-numeric value field"))
            .collect::<Result<_>>()?;

        match grouped.last_mut() {
            Some((id, _, channels)) if *id == instance => channels.push(values),
            _ => grouped.push((instance, label, vec![values])),
        }
    }

    let mut instances = Vec::with_capacity(grouped.len());
    let mut labels = Vec::with_capacity(grouped.len());
    for (_, label, channels) in grouped {
        let n_channels = channels.len();
        let n_timepoints = channels.first().map(|c| c.len()).unwrap_or(0);
        let mut values = Array2::zeros((n_timepoints, n_channels));
        for (c, channel) in channels.iter().enumerate() {
            anyhow::ensure!(
                channel.len() == n_timepoints,
                "ragged channel lengths within one instance"
            );
            for (t, &v) in channel.iter().enumerate() {
                values[(t, c)] = v;
            }
        }
        instances.push(Series::new((0..n_timepoints as i64).collect(), values));
        labels.push(label);
    }
    log::debug!("Loaded {} multivariate instances", instances.len());
    Ok((Panel::new(instances), labels))
}

/// Reproducible class labels for synthetic panels: balanced round-robin
/// assignment, shuffled with the seeded generator.
pub fn make_classification_y(n_instances: usize, n_classes: usize, seed: u64) -> Vec<ClassLabel> {
    assert!(n_classes > 0, "n_classes must be positive");
    let mut labels: Vec<ClassLabel> = (0..n_instances)
        .map(|i| format!("class_{}", i % n_classes))
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    labels.shuffle(&mut rng);
    labels
}

/// Reproducible synthetic panel data.
///
/// Values are uniform noise shifted to stay strictly positive; when `y` is
/// given, each class adds a distinct offset so that classes are separable.
pub fn make_panel_x(
    n_instances: usize,
    n_channels: usize,
    n_timepoints: usize,
    seed: u64,
    y: Option<&[ClassLabel]>,
) -> Panel {
    if let Some(y) = y {
        assert_eq!(y.len(), n_instances, "y length must match n_instances");
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let class_offset = |label: &ClassLabel| -> f64 {
        // class_<k> labels carry their own offset ordering
        label
            .rsplit('_')
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0)
            * 3.0
    };

    let instances = (0..n_instances)
        .map(|i| {
            let offset = 2.0 + y.map(|y| class_offset(&y[i])).unwrap_or(0.0);
            let mut values = Array2::zeros((n_timepoints, n_channels));
            for t in 0..n_timepoints {
                for c in 0..n_channels {
                    values[(t, c)] = offset + rng.gen_range(0.0..1.0);
                }
            }
            Series::new((0..n_timepoints as i64).collect(), values)
        })
        .collect();
    Panel::new(instances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_test_splits_have_expected_shape() {
        let (x_train, y_train) = load_unit_test(Split::Train).unwrap();
        let (x_test, y_test) = load_unit_test(Split::Test).unwrap();

        assert_eq!(x_train.n_instances(), 20);
        assert_eq!(y_train.len(), 20);
        assert_eq!(x_test.n_instances(), 10);
        assert_eq!(y_test.len(), 10);
        assert!(x_train.is_univariate());
    }

    #[test]
    fn basic_motions_is_multivariate() {
        let (x, y) = load_basic_motions(Split::Train).unwrap();
        assert_eq!(x.n_instances(), 20);
        assert_eq!(x.n_channels(), 6);
        assert_eq!(y.iter().collect::<std::collections::BTreeSet<_>>().len(), 4);
    }

    #[test]
    fn generators_are_reproducible() {
        let y1 = make_classification_y(10, 2, 42);
        let y2 = make_classification_y(10, 2, 42);
        assert_eq!(y1, y2);

        let x1 = make_panel_x(10, 1, 20, 42, Some(&y1));
        let x2 = make_panel_x(10, 1, 20, 42, Some(&y1));
        assert_eq!(x1, x2);
    }

    #[test]
    fn class_offsets_separate_synthetic_classes() {
        let y = make_classification_y(6, 2, 7);
        let x = make_panel_x(6, 1, 5, 7, Some(&y));
        for (instance, label) in x.instances().iter().zip(y.iter()) {
            let mean: f64 = (0..5).map(|t| instance.values()[(t, 0)]).sum::<f64>() / 5.0;
            if label == "class_0" {
                assert!(mean < 3.5, "class_0 mean {} too high", mean);
            } else {
                assert!(mean > 4.5, "class_1 mean {} too low", mean);
            }
        }
    }
}
