mod cache;
mod groups;
mod health;
mod pairs;
mod users;

pub use cache::refresh_cache_handler;
pub use groups::{groups_handler, GroupsRequest};
pub use health::{health_handler, root_handler, HealthResponse};
pub use pairs::{pairs_handler, PairsQuery, PairsResponse};
pub use users::{users_handler, UsersResponse};
