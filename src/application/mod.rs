pub mod embedding_cache;
pub mod executor;
pub mod grouping;
pub mod grouping_service;
pub mod import;
pub mod pairing;
pub mod strategies;
