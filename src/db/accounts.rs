// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account repository on top of the key-value store.
//!
//! Persists two records:
//! - `users`: map from normalized email to account
//! - `session`: normalized email of the logged-in account, if any

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::keys;
use crate::db::store::{KvStore, StoreError, StoreResult};
use crate::models::{normalize_email, ScheduleItem, UserAccount};

/// All accounts keyed by normalized email.
pub type AccountMap = BTreeMap<String, UserAccount>;

/// Account and session persistence.
///
/// Every write of `users` rewrites the whole collection. Read-modify-write
/// cycles within this process are serialized by `write_lock`.
#[derive(Clone)]
pub struct AccountRepository {
    store: KvStore,
    write_lock: Arc<Mutex<()>>,
}

impl AccountRepository {
    pub fn new(store: KvStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Get every stored account.
    ///
    /// A missing or corrupt collection reads as empty.
    pub async fn get_all(&self) -> StoreResult<AccountMap> {
        match self.store.get_as::<AccountMap>(keys::USERS).await {
            Ok(users) => Ok(users.unwrap_or_default()),
            Err(StoreError::Corrupt { message, .. }) => {
                tracing::warn!(error = %message, "User collection is corrupt, treating as empty");
                Ok(AccountMap::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Find an account by email (normalized before lookup).
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        let email = normalize_email(email);
        Ok(self.get_all().await?.remove(&email))
    }

    /// Insert or replace an account. The stored email is normalized.
    pub async fn save(&self, account: &UserAccount) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut account = account.clone();
        account.email = normalize_email(&account.email);

        let mut users = self.get_all().await?;
        tracing::debug!(email = %account.email, "Saving account");
        users.insert(account.email.clone(), account);

        self.store.set(keys::USERS, &users).await
    }

    /// Replace the schedule of an existing account.
    ///
    /// Returns `false` if no account exists for `email`.
    pub async fn update_schedule(
        &self,
        email: &str,
        schedule: &[ScheduleItem],
    ) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;

        let email = normalize_email(email);
        let mut users = self.get_all().await?;

        let Some(account) = users.get_mut(&email) else {
            tracing::warn!(email = %email, "Schedule update for unknown account");
            return Ok(false);
        };
        account.schedule = schedule.to_vec();

        self.store.set(keys::USERS, &users).await?;
        Ok(true)
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Mark `email` (normalized) as the logged-in account.
    pub async fn set_session(&self, email: &str) -> StoreResult<()> {
        self.store
            .set(keys::SESSION, &normalize_email(email))
            .await
    }

    /// Email of the logged-in account, if any.
    pub async fn get_session(&self) -> StoreResult<Option<String>> {
        self.store.get_as::<String>(keys::SESSION).await
    }

    pub async fn clear_session(&self) -> StoreResult<()> {
        self.store.delete(keys::SESSION).await
    }
}
