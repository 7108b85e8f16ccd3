// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SilverFit: safe weekly workout plans for older adults
//!
//! This crate provides the local backend: accounts kept in a key-value
//! store, a static exercise catalog, and weekly schedules generated by
//! Gemini and filtered against the user's health restrictions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{AccountRepository, KvStore};
use services::{AppSession, GeminiClient, ScheduleGenerator};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: AppSession,
}

impl AppState {
    /// Wire the session services on top of `store`.
    pub fn new(config: Config, store: KvStore) -> Self {
        let accounts = AccountRepository::new(store);
        let generator = ScheduleGenerator::new(GeminiClient::new(&config));
        Self {
            session: AppSession::new(accounts, generator),
            config,
        }
    }
}
