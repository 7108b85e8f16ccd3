// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session facade used by the UI.
//!
//! Holds the logged-in account and its workout state. Each operation clears
//! the previous error first; failures are recorded as a user-facing message.
//! The `try_*` methods return the typed error as well, the plain methods
//! collapse it to `bool`.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tokio::sync::RwLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{AccountRepository, StoreError};
use crate::models::{ScheduleItem, UserAccount, UserProfile};
use crate::services::auth::{AuthError, AuthService};
use crate::services::catalog::EXERCISE_CATALOG;
use crate::services::reminders::{plan_reminders, Reminder};
use crate::services::schedule::{ScheduleError, ScheduleGenerator};
use crate::services::workout::{ProfileError, ProfileUpdate, WorkoutState};

/// Session failures. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("Please log in first")]
    NotAuthenticated,

    #[error("Could not save your changes. Please try again.")]
    Storage(#[from] StoreError),

    #[error("Could not create your schedule: {0}")]
    Generation(#[from] ScheduleError),

    #[error("A schedule is already being generated")]
    GenerationInProgress,

    #[error("Your session changed while the schedule was being generated")]
    SessionChanged,
}

/// Serializable view of the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub email: Option<String>,
    pub has_profile: bool,
    pub is_loading: bool,
    pub is_generating: bool,
    pub error: Option<String>,
    pub profile: UserProfile,
    pub schedule: Vec<ScheduleItem>,
    pub completed: usize,
    pub total: usize,
}

#[derive(Default)]
struct SessionState {
    user: Option<UserAccount>,
    workout: WorkoutState,
    error: Option<SessionError>,
    is_loading: bool,
}

impl SessionState {
    fn set_user(&mut self, user: Option<UserAccount>) {
        self.workout = WorkoutState::from_account(user.as_ref());
        self.user = user;
    }

    /// Whole account record built from the current workout state.
    fn account_record(&self) -> Result<UserAccount, SessionError> {
        self.account_record_for(&self.workout)
    }

    /// Whole account record built from `workout`.
    fn account_record_for(&self, workout: &WorkoutState) -> Result<UserAccount, SessionError> {
        let user = self.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        Ok(UserAccount {
            profile: Some(workout.profile.clone()),
            schedule: workout.schedule.clone(),
            ..user.clone()
        })
    }

    fn is_current(&self, email: &str) -> bool {
        self.user.as_ref().map(|u| u.email.as_str()) == Some(email)
    }

    /// Adopt a freshly persisted record if it still belongs to the current user.
    fn commit(&mut self, account: UserAccount) {
        if self.is_current(&account.email) {
            self.user = Some(account);
        }
    }

    /// Adopt a persisted record and replay the persisted change on the live
    /// workout state. Nothing changes if the user switched meanwhile.
    fn commit_with(&mut self, account: UserAccount, apply: impl FnOnce(&mut WorkoutState)) {
        if self.is_current(&account.email) {
            apply(&mut self.workout);
            self.user = Some(account);
        }
    }
}

/// Resets the generating flag when generation ends, including on cancellation.
struct GeneratingGuard<'a>(&'a AtomicBool);

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Session of the single local user.
pub struct AppSession {
    auth: AuthService,
    accounts: AccountRepository,
    generator: ScheduleGenerator,
    state: RwLock<SessionState>,
    generating: AtomicBool,
}

impl AppSession {
    pub fn new(accounts: AccountRepository, generator: ScheduleGenerator) -> Self {
        Self {
            auth: AuthService::new(accounts.clone()),
            accounts,
            generator,
            state: RwLock::new(SessionState::default()),
            generating: AtomicBool::new(false),
        }
    }

    async fn begin(&self, loading: bool) {
        let mut state = self.state.write().await;
        state.error = None;
        state.is_loading = loading;
    }

    async fn record<T>(&self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        let mut state = self.state.write().await;
        state.is_loading = false;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Session operation failed");
            state.error = Some(err.clone());
        }
        result
    }

    // ─── Authentication ──────────────────────────────────────────

    /// Load the persisted session on start-up.
    pub async fn restore(&self) {
        self.begin(true).await;
        let result = self.auth.restore().await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(user) => state.set_user(user),
            Err(err) => {
                tracing::warn!(error = %err, "Session restore failed");
                state.error = Some(err.into());
                state.set_user(None);
            }
        }
    }

    pub async fn try_login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.begin(true).await;
        let result = match self.auth.login(email, password).await {
            Ok(account) => {
                self.state.write().await.set_user(Some(account));
                Ok(())
            }
            Err(err) => Err(err.into()),
        };
        self.record(result).await
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.try_login(email, password).await.is_ok()
    }

    pub async fn try_register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), SessionError> {
        self.begin(true).await;
        let result = match self.auth.register(email, password, confirm_password).await {
            Ok(account) => {
                self.state.write().await.set_user(Some(account));
                Ok(())
            }
            Err(err) => Err(err.into()),
        };
        self.record(result).await
    }

    pub async fn register(&self, email: &str, password: &str, confirm_password: &str) -> bool {
        self.try_register(email, password, confirm_password)
            .await
            .is_ok()
    }

    /// Log out. Local state is cleared even if the stored session could not be.
    pub async fn logout(&self) {
        self.begin(false).await;
        let result = self.auth.logout().await.map_err(SessionError::from);
        self.state.write().await.set_user(None);
        let _ = self.record(result).await;
    }

    // ─── Getters ─────────────────────────────────────────────────

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    pub async fn current_email(&self) -> Option<String> {
        self.state.read().await.user.as_ref().map(|u| u.email.clone())
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    pub async fn error_message(&self) -> Option<String> {
        self.state.read().await.error.as_ref().map(|e| e.to_string())
    }

    pub async fn profile(&self) -> UserProfile {
        self.state.read().await.workout.profile.clone()
    }

    pub async fn schedule(&self) -> Vec<ScheduleItem> {
        self.state.read().await.workout.schedule.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        let (completed, total) = state.workout.progress();
        SessionSnapshot {
            is_authenticated: state.user.is_some(),
            email: state.user.as_ref().map(|u| u.email.clone()),
            has_profile: state.user.as_ref().is_some_and(|u| u.profile.is_some()),
            is_loading: state.is_loading,
            is_generating: self.is_generating(),
            error: state.error.as_ref().map(|e| e.to_string()),
            profile: state.workout.profile.clone(),
            schedule: state.workout.schedule.clone(),
            completed,
            total,
        }
    }

    // ─── Profile ─────────────────────────────────────────────────

    pub async fn set_name(&self, name: &str) {
        let mut state = self.state.write().await;
        state.error = None;
        state.workout.set_name(name);
    }

    pub async fn set_age(&self, age: u32) {
        let mut state = self.state.write().await;
        state.error = None;
        state.workout.set_age(age);
    }

    pub async fn set_time(&self, time: &str) {
        let mut state = self.state.write().await;
        state.error = None;
        state.workout.set_time(time);
    }

    pub async fn toggle_restriction(&self, id: &str) {
        let mut state = self.state.write().await;
        state.error = None;
        state.workout.toggle_restriction(id);
    }

    pub async fn toggle_day(&self, day: &str) {
        let mut state = self.state.write().await;
        state.error = None;
        state.workout.toggle_day(day);
    }

    /// Apply a partial update to the local profile. Not persisted.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), SessionError> {
        self.begin(false).await;
        let result = self
            .state
            .write()
            .await
            .workout
            .apply_update(update)
            .map_err(SessionError::from);
        self.record(result).await
    }

    pub async fn try_save_profile(&self) -> Result<(), SessionError> {
        self.begin(false).await;
        let result = self.persist_profile().await;
        self.record(result).await
    }

    pub async fn save_profile(&self) -> bool {
        self.try_save_profile().await.is_ok()
    }

    async fn persist_profile(&self) -> Result<(), SessionError> {
        let account = {
            let state = self.state.read().await;
            let account = state.account_record()?;
            state.workout.validate_profile()?;
            account
        };

        self.accounts.save(&account).await?;
        tracing::info!(email = %account.email, "Profile saved");
        self.state.write().await.commit(account);
        Ok(())
    }

    // ─── Schedule ────────────────────────────────────────────────

    /// Generate and persist a new weekly schedule.
    ///
    /// Returns the number of items. A generation failure still stores the
    /// empty schedule before the error is returned.
    pub async fn try_create_schedule(&self) -> Result<usize, SessionError> {
        self.begin(false).await;
        let result = self.generate_and_store().await;
        self.record(result).await
    }

    pub async fn create_schedule(&self) -> bool {
        self.try_create_schedule().await.is_ok()
    }

    async fn generate_and_store(&self) -> Result<usize, SessionError> {
        if self.generating.swap(true, Ordering::SeqCst) {
            return Err(SessionError::GenerationInProgress);
        }
        let _guard = GeneratingGuard(&self.generating);

        let (email, profile) = {
            let state = self.state.read().await;
            let user = state.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
            (user.email.clone(), state.workout.profile.clone())
        };

        // No lock is held across the model call
        let (schedule, failure) = match self.generator.generate(&profile).await {
            Ok(items) => (items, None),
            Err(err) => {
                tracing::warn!(error = %err, "Schedule generation failed");
                (Vec::new(), Some(err))
            }
        };
        let count = schedule.len();

        // The live state only changes once the new schedule is stored
        let account = {
            let state = self.state.read().await;
            if !state.is_current(&email) {
                tracing::info!(email = %email, "Account changed during generation, discarding");
                return Err(SessionError::SessionChanged);
            }
            let mut updated = state.workout.clone();
            updated.replace_schedule(schedule.clone());
            state.account_record_for(&updated)?
        };

        self.accounts.save(&account).await?;
        self.state
            .write()
            .await
            .commit_with(account, |workout| workout.replace_schedule(schedule));

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(count),
        }
    }

    /// Mark the items on `date` as completed and persist.
    ///
    /// Returns `Ok(false)` when nothing changed; nothing is written then.
    pub async fn try_complete_exercise(&self, date: &str) -> Result<bool, SessionError> {
        self.begin(false).await;
        let result = self.complete_and_store(date).await;
        self.record(result).await
    }

    pub async fn complete_exercise(&self, date: &str) -> bool {
        self.try_complete_exercise(date).await.is_ok()
    }

    async fn complete_and_store(&self, date: &str) -> Result<bool, SessionError> {
        // Completion is applied to a copy; the live state follows the store
        let account = {
            let state = self.state.read().await;
            if state.user.is_none() {
                return Err(SessionError::NotAuthenticated);
            }
            let mut updated = state.workout.clone();
            if !updated.complete_exercise(date) {
                return Ok(false);
            }
            state.account_record_for(&updated)?
        };

        self.accounts.save(&account).await?;
        tracing::info!(email = %account.email, date = %date, "Exercise completed");
        self.state.write().await.commit_with(account, |workout| {
            workout.complete_exercise(date);
        });
        Ok(true)
    }

    pub async fn next_activity(&self, today: NaiveDate) -> Option<ScheduleItem> {
        self.state.read().await.workout.next_activity(today).cloned()
    }

    pub async fn reminders(&self, now: NaiveDateTime) -> Vec<Reminder> {
        let state = self.state.read().await;
        plan_reminders(
            &state.workout.schedule,
            &state.workout.profile.availability.time,
            EXERCISE_CATALOG,
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::KvStore;
    use crate::services::gemini::GeminiClient;

    fn session_with(store: KvStore) -> AppSession {
        let config = Config {
            gemini_api_key: None,
            ..Config::default()
        };
        AppSession::new(
            AccountRepository::new(store),
            ScheduleGenerator::new(GeminiClient::new(&config)),
        )
    }

    #[tokio::test]
    async fn test_register_and_logout() {
        let session = session_with(KvStore::new_memory());
        assert!(session.register(" Ana@Mail.com ", "secret1", "secret1").await);
        assert!(session.is_authenticated().await);
        assert_eq!(session.current_email().await.as_deref(), Some("ana@mail.com"));

        session.logout().await;
        assert!(!session.is_authenticated().await);
        assert_eq!(session.profile().await, UserProfile::default());
    }

    #[tokio::test]
    async fn test_failure_sets_message_and_next_call_clears_it() {
        let session = session_with(KvStore::new_memory());
        assert!(!session.login("nobody@mail.com", "secret1").await);
        assert_eq!(
            session.error_message().await.as_deref(),
            Some("Invalid email or password")
        );

        assert!(session.register("ana@mail.com", "secret1", "secret1").await);
        assert_eq!(session.error_message().await, None);
    }

    #[tokio::test]
    async fn test_profile_edits_clear_previous_error() {
        let session = session_with(KvStore::new_memory());
        assert!(session.register("ana@mail.com", "secret1", "secret1").await);

        assert!(!session.save_profile().await);
        assert!(session.error_message().await.is_some());
        session.toggle_day("Segunda").await;
        assert_eq!(session.error_message().await, None);

        assert!(!session.save_profile().await);
        session.set_name("Maria").await;
        assert_eq!(session.error_message().await, None);

        assert!(!session.save_profile().await);
        session.toggle_restriction("knee_pain").await;
        assert_eq!(session.error_message().await, None);
    }

    #[tokio::test]
    async fn test_offline_store_fails_softly() {
        let session = session_with(KvStore::new_offline());
        assert!(!session.register("ana@mail.com", "secret1", "secret1").await);
        assert_eq!(
            session.error_message().await.as_deref(),
            Some("Could not create account. Please try again.")
        );
        assert!(!session.login("ana@mail.com", "secret1").await);
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_save_profile_requires_login() {
        let session = session_with(KvStore::new_memory());
        assert_eq!(
            session.try_save_profile().await,
            Err(SessionError::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn test_create_schedule_without_key_stores_empty_schedule() {
        let store = KvStore::new_memory();
        let session = session_with(store.clone());
        assert!(session.register("ana@mail.com", "secret1", "secret1").await);

        let err = session.try_create_schedule().await.unwrap_err();
        assert_eq!(err, SessionError::Generation(ScheduleError::MissingApiKey));
        assert!(session.schedule().await.is_empty());
        assert!(!session.is_generating());

        let stored = AccountRepository::new(store)
            .find_by_email("ana@mail.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.profile.is_some());
    }
}
