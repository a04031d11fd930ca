mod common;

use photo_contest::entities::contest_entry::EntryStatus;
use photo_contest::entities::user::Role;
use photo_contest::services::StoreError;
use uuid::Uuid;

use common::{count_files, seed_contest, seed_user, setup, submission};

#[tokio::test]
async fn owner_can_withdraw_and_files_are_kept() {
    let env = setup().await;
    let owner = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let entry = env
        .state
        .pipeline
        .submit(owner.id, contest.id, submission("Jane Doe", 400, 300))
        .await
        .unwrap();
    let files_before = count_files(env.media.path());

    let withdrawn = env.repo.withdraw(entry.photo_id, owner.id).await.unwrap();

    assert_eq!(withdrawn.id, entry.id);
    assert_eq!(withdrawn.status, EntryStatus::Withdrawn);
    assert_eq!(withdrawn.updated_by, "Jane Doe");
    assert_eq!(env.repo.photo_files(entry.photo_id).await.unwrap().len(), 5);
    assert_eq!(count_files(env.media.path()), files_before);
    assert!(!env.repo.photo_by_id(entry.photo_id).await.unwrap().deleted);
}

#[tokio::test]
async fn foreign_photo_looks_exactly_like_a_missing_one() {
    let env = setup().await;
    let owner = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let other = seed_user(&env.repo, "John Roe", "john@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let entry = env
        .state
        .pipeline
        .submit(owner.id, contest.id, submission("Jane Doe", 400, 300))
        .await
        .unwrap();

    let foreign = env.repo.withdraw(entry.photo_id, other.id).await.unwrap_err();
    let missing = env.repo.withdraw(Uuid::new_v4(), other.id).await.unwrap_err();

    assert!(matches!(foreign, StoreError::NotFound));
    assert!(matches!(missing, StoreError::NotFound));
    assert_eq!(foreign.to_string(), missing.to_string());

    let untouched = env.repo.entry_by_id(entry.id).await.unwrap();
    assert_eq!(untouched.status, EntryStatus::Active);
}
