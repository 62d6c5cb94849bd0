//! Authentication and authorization primitives

pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod token;

pub use middleware::{auth_middleware, CurrentUser};
pub use password::PasswordHasher;
pub use rate_limit::RateLimiter;
pub use token::{Claims, TokenService};
