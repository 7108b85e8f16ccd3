// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account repository tests against the file-backed store.

use silverfit::db::{keys, AccountRepository, KvStore, StoreError};
use silverfit::models::{ScheduleItem, UserAccount};

mod common;

#[tokio::test]
async fn test_accounts_survive_reopen() {
    let dir = common::temp_dir("reopen");

    {
        let repo = AccountRepository::new(KvStore::open(&dir).await.unwrap());
        let mut account = UserAccount::new("Ana@Mail.com", "secret1");
        account.profile = Some(common::knee_pain_profile());
        account.schedule = vec![ScheduleItem::pending("2025-01-06", "ex_001")];
        repo.save(&account).await.unwrap();
        repo.set_session(" ANA@mail.com").await.unwrap();
    }

    let repo = AccountRepository::new(KvStore::open(&dir).await.unwrap());
    let found = repo.find_by_email(" ana@MAIL.com ").await.unwrap().unwrap();
    assert_eq!(found.email, "ana@mail.com");
    assert_eq!(found.profile, Some(common::knee_pain_profile()));
    assert_eq!(found.schedule.len(), 1);
    assert_eq!(
        repo.get_session().await.unwrap().as_deref(),
        Some("ana@mail.com")
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_corrupt_users_file_reads_as_empty() {
    let dir = common::temp_dir("corrupt");
    let store = KvStore::open(&dir).await.unwrap();
    std::fs::write(dir.join(format!("{}.json", keys::USERS)), "{not json").unwrap();

    let repo = AccountRepository::new(store.clone());
    assert!(repo.get_all().await.unwrap().is_empty());
    assert!(matches!(
        store.get(keys::USERS).await,
        Err(StoreError::Corrupt { .. })
    ));

    // The next save replaces the corrupt blob
    repo.save(&UserAccount::new("ana@mail.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(repo.get_all().await.unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_duplicate_dates_are_kept() {
    let repo = AccountRepository::new(KvStore::new_memory());
    repo.save(&UserAccount::new("ana@mail.com", "secret1"))
        .await
        .unwrap();

    let schedule = vec![
        ScheduleItem::pending("2025-01-06", "ex_001"),
        ScheduleItem::pending("2025-01-06", "ex_003"),
    ];
    assert!(repo.update_schedule("ana@mail.com", &schedule).await.unwrap());

    let found = repo.find_by_email("ana@mail.com").await.unwrap().unwrap();
    assert_eq!(found.schedule, schedule);
}

#[tokio::test]
async fn test_offline_store_is_an_error_not_empty() {
    let repo = AccountRepository::new(KvStore::new_offline());
    assert_eq!(repo.get_all().await, Err(StoreError::Unavailable));
    assert!(repo.find_by_email("ana@mail.com").await.is_err());
}
