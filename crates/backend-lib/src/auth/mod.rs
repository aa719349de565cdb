// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod csrf;
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token_generator;
pub mod users;
mod service;
mod service_impl;

pub use csrf::CsrfTokens;
pub use password::{PasswordHasher, DEFAULT_HASH_COST};
pub use rate_limit::RateLimiter;
pub use session::{Session, SessionManager, SESSION_TTL_SECS};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use users::{UserRecord, UserStore};
