// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request body validation.

use ballot_common::{LoginRequest, RegisterRequest};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::error::AppError;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 100;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex"));

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username: Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("username: Username must be less than 20 characters")]
    UsernameTooLong,

    #[error("email: Invalid email address")]
    InvalidEmail,

    #[error("password: Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("password: Password too long")]
    PasswordTooLong,

    #[error("usernameOrEmail: Username or email is required")]
    MissingLogin,
}

impl From<Vec<ValidationError>> for AppError {
    fn from(errors: Vec<ValidationError>) -> Self {
        AppError::InvalidInput(errors.iter().map(ToString::to_string).collect())
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

fn check_password(password: &str, errors: &mut Vec<ValidationError>) {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooShort);
    } else if len > MAX_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooLong);
    }
}

/// Validate a registration body, reporting every problem at once
pub fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    let username_len = req.username.chars().count();
    if username_len < MIN_USERNAME_LENGTH {
        errors.push(ValidationError::UsernameTooShort);
    } else if username_len > MAX_USERNAME_LENGTH {
        errors.push(ValidationError::UsernameTooLong);
    }

    if !EMAIL_REGEX.is_match(&req.email) {
        errors.push(ValidationError::InvalidEmail);
    }

    check_password(&req.password, &mut errors);
    finish(errors)
}

/// Validate a login body
pub fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if req.username_or_email.is_empty() {
        errors.push(ValidationError::MissingLogin);
    }
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooShort);
    }
    finish(errors)
}
