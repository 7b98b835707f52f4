//! Time-series classifier implementations.

pub mod centroid;
pub mod knn;

pub use centroid::NearestCentroidClassifier;
pub use knn::KNeighborsTimeSeriesClassifier;
