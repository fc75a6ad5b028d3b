pub mod embedding;
pub mod group_size;
pub mod similarity;
pub mod strategy_kind;
pub mod user_id;
