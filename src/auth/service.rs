use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{Role, User};
use crate::error::{is_unique_violation, ApiError, FieldError};
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Canonical form used for storage and lookup, so the unique constraint
/// catches case/whitespace variants of the same address.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Schema constraints for a new account, checked before construction.
/// Expects an already-normalized email.
pub(crate) fn validate_new_account(name: &str, email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please provide a valid email address"));
    }
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    errors
}

/// Create an account and mint a token bound to the new user.
pub async fn create_account(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<(User, String), ApiError> {
    let email = normalize_email(email);
    let name = name.trim();

    let errors = validate_new_account(name, &email, password);
    if !errors.is_empty() {
        warn!(?errors, "signup validation failed");
        return Err(ApiError::Validation(errors));
    }

    let hash = hash_password(password)?;

    let user = match User::create(&state.db, name, &email, &hash, role).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %email, "email already registered");
            return Err(ApiError::DuplicateEmail);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    let token = JwtKeys::from_ref(state).sign(user.id)?;
    info!(user_id = %user.id, role = ?user.role, "account created");
    Ok((user, token))
}

/// Look up by email and compare the supplied password against the stored
/// hash. Unknown email and wrong password are indistinguishable to the
/// caller.
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(User, String), ApiError> {
    let email = normalize_email(email);

    let user = match User::find_by_email(&state.db, &email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e.into());
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}
