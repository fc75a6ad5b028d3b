pub mod embedding_snapshot;
pub mod group;
pub mod grouping_result;
