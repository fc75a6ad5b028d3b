pub mod clock;
pub mod community_detector;
pub mod embedding_store;
pub mod grouping_strategy;
