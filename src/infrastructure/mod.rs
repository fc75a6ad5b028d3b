pub mod clock;
pub mod community;
pub mod observability;
pub mod sqlite;
pub mod stores;
