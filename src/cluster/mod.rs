// Clustering pipeline: standardization, k-means assignment, k diagnostics.

pub mod diagnostics;
pub mod kmeans;
pub mod standardize;
