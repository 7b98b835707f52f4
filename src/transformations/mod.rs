//! Time-series transformer implementations.

pub mod detrend;
pub mod exponent;
pub mod segment;
pub mod summarize;

pub use detrend::Detrender;
pub use exponent::ExponentTransformer;
pub use segment::SlidingWindowSegmenter;
pub use summarize::SummaryTransformer;

use crate::data::{Data, Hierarchical, Panel, Series};

/// Apply a per-series function across a container, preserving its scitype.
///
/// This is the vectorization backbone for Series→Series transformers: a
/// `Series` maps to a `Series`, a `Panel` instance-wise, a `Hierarchical`
/// panel- and instance-wise. Callers must not pass `Table` data.
pub(crate) fn map_series<F>(data: &Data, f: F) -> Data
where
    F: Fn(&Series) -> Series,
{
    match data {
        Data::Series(s) => Data::Series(f(s)),
        Data::Panel(p) => Data::Panel(p.map_instances(&f)),
        Data::Hierarchical(h) => Data::Hierarchical(Hierarchical::new(
            h.panels().iter().map(|p| p.map_instances(&f)).collect(),
        )),
        Data::Table(_) => panic!("map_series does not apply to Table data"),
    }
}

/// Flatten a container into its series instances, in traversal order.
pub(crate) fn collect_series(data: &Data) -> Vec<&Series> {
    match data {
        Data::Series(s) => vec![s],
        Data::Panel(p) => p.instances().iter().collect(),
        Data::Hierarchical(h) => h
            .panels()
            .iter()
            .flat_map(|p| p.instances().iter())
            .collect(),
        Data::Table(_) => Vec::new(),
    }
}
