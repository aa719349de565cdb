// ============================
// crates/backend-lib/src/auth/csrf.rs
// ============================
//! Single-use CSRF tokens.
use crate::auth::token_generator::generate_secure_token;
use crate::error::AppError;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Set of issued, not yet consumed tokens
#[derive(Clone, Default)]
pub struct CsrfTokens {
    issued: Arc<Mutex<HashSet<String>>>,
}

impl CsrfTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token
    pub fn issue(&self) -> Result<String, AppError> {
        let token = generate_secure_token()?;
        self.issued.lock().insert(token.clone());
        Ok(token)
    }

    /// Accept a token once; any later presentation fails
    pub fn consume(&self, token: &str) -> bool {
        self.issued.lock().remove(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_single_use() {
        let csrf = CsrfTokens::new();
        let token = csrf.issue().unwrap();
        assert!(csrf.consume(&token));
        assert!(!csrf.consume(&token));
    }

    #[test]
    fn test_unknown_token_rejected() {
        let csrf = CsrfTokens::new();
        csrf.issue().unwrap();
        assert!(!csrf.consume("forged"));
    }
}
