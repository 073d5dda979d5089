//! High-level pipelines: partition building and report tables.

pub mod build_partition;
pub mod report;

pub use build_partition::{PartitionArtifacts, PartitionBuildPipeline};
pub use report::{metrics_table, MovieMetricsRow};
