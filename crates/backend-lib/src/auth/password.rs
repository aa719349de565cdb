// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use crate::error::ConfigError;
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use zeroize::Zeroize;

/// Default work factor (scrypt `log_n`, i.e. 2^15 iterations of the mix)
pub const DEFAULT_HASH_COST: u8 = 15;

/// Highest accepted work factor. Memory use doubles per step; 20 is ~1 GiB.
pub const MAX_HASH_COST: u8 = 20;

/// Adaptive one-way hasher for account passwords.
///
/// The cost is checked once, at construction. A missing or zero cost is a
/// startup failure rather than a silent fallback to something weak.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    params: Params,
    cost: u8,
}

impl PasswordHasher {
    /// Create a hasher with the given work factor
    pub fn new(cost: u8) -> Result<Self, ConfigError> {
        if cost == 0 || cost > MAX_HASH_COST {
            return Err(ConfigError::HashCost(cost));
        }
        let params = Params::new(cost, Params::RECOMMENDED_R, Params::RECOMMENDED_P, Params::RECOMMENDED_LEN)
            .map_err(|_| ConfigError::HashCost(cost))?;
        Ok(Self { params, cost })
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    /// Hash a password into a PHC string (`$scrypt$ln=..,r=..,p=..$salt$hash`)
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)?
            .to_string();
        Ok(hash)
    }

    /// Hash a password and zeroize the original
    pub fn hash_owned(&self, mut plain: String) -> anyhow::Result<String> {
        let hash = self.hash(&plain);
        plain.zeroize();
        hash
    }

    /// Verify a password against a stored hash.
    ///
    /// Work factor and salt come from the hash itself, so hashes produced
    /// under an older cost still verify. Anything unparsable is a mismatch.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the suite fast; the algorithm is the same.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let h = hasher();
        let hash = h.hash("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$scrypt$"));
        assert!(h.verify("correct horse", &hash));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let h = hasher();
        let hash = h.hash("password-one").unwrap();
        assert!(!h.verify("password-two", &hash));
    }

    #[test]
    fn test_same_password_salted_differently() {
        let h = hasher();
        let a = h.hash("same").unwrap();
        let b = h.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("same", &a));
        assert!(h.verify("same", &b));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let h = hasher();
        assert!(!h.verify("anything", ""));
        assert!(!h.verify("anything", "not-a-phc-string"));
        assert!(!h.verify("anything", "$2a$12$K3JNi5dYFFdtYOO7qtCQHeAkI.3zq3m83NmE4G83FKgc4T281xvU6"));
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let old = PasswordHasher::new(5).unwrap();
        let hash = old.hash("migrated").unwrap();
        assert!(hasher().verify("migrated", &hash));
    }

    #[test]
    fn test_zero_cost_rejected() {
        assert!(matches!(PasswordHasher::new(0), Err(ConfigError::HashCost(0))));
        assert!(PasswordHasher::new(MAX_HASH_COST + 1).is_err());
        assert_eq!(PasswordHasher::new(DEFAULT_HASH_COST).unwrap().cost(), DEFAULT_HASH_COST);
    }

    #[test]
    fn test_hash_owned() {
        let h = hasher();
        let hash = h.hash_owned("owned-secret".to_string()).unwrap();
        assert!(h.verify("owned-secret", &hash));
    }
}
