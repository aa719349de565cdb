// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_DESTROYED: &str = "session.destroyed";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const RATE_LIMIT_REJECTED: &str = "rate_limit.rejected";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const USER_REGISTERED: &str = "auth.registered";
