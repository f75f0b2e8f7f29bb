// Service exports
pub mod cache;

pub use cache::{CacheKey, CacheStats, RouteCache};
