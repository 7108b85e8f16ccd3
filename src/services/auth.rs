// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local account authentication.
//!
//! Credentials are checked against the account collection; the session key
//! records who is logged in across restarts.

use crate::db::{AccountRepository, StoreError};
use crate::models::{normalize_email, UserAccount};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication failures. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("This email is already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Could not create account. Please try again.")]
    RegistrationFailed(StoreError),

    #[error("Could not reach local storage. Please try again.")]
    Storage(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Storage(err)
    }
}

/// Authentication service over the account repository.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
}

impl AuthService {
    pub fn new(accounts: AccountRepository) -> Self {
        Self { accounts }
    }

    /// Check credentials and open a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let email = normalize_email(email);

        let account = match self.accounts.find_by_email(&email).await? {
            Some(account) if account.password == password => account,
            _ => {
                tracing::info!(email = %email, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.accounts.set_session(&account.email).await?;
        tracing::info!(email = %account.email, "User logged in");
        Ok(account)
    }

    /// Create an account and open a session for it.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserAccount, AuthError> {
        let email = normalize_email(email);

        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let existing = self
            .accounts
            .find_by_email(&email)
            .await
            .map_err(AuthError::RegistrationFailed)?;
        if existing.is_some() {
            tracing::info!(email = %email, "Registration rejected: duplicate email");
            return Err(AuthError::DuplicateEmail);
        }

        let account = UserAccount::new(&email, password);
        self.accounts
            .save(&account)
            .await
            .map_err(AuthError::RegistrationFailed)?;
        self.accounts
            .set_session(&email)
            .await
            .map_err(AuthError::RegistrationFailed)?;

        tracing::info!(email = %email, "Account registered");
        Ok(account)
    }

    /// Close the current session.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.accounts.clear_session().await?;
        tracing::info!("User logged out");
        Ok(())
    }

    /// Load the account named by the stored session, if any.
    ///
    /// A session pointing at a missing account is cleared.
    pub async fn restore(&self) -> Result<Option<UserAccount>, AuthError> {
        let Some(email) = self.accounts.get_session().await? else {
            return Ok(None);
        };

        match self.accounts.find_by_email(&email).await? {
            Some(account) => {
                tracing::info!(email = %account.email, "Session restored");
                Ok(Some(account))
            }
            None => {
                tracing::warn!(email = %email, "Clearing orphan session");
                self.accounts.clear_session().await?;
                Ok(None)
            }
        }
    }
}
