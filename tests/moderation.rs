mod common;

use chrono::{Duration, Utc};
use photo_contest::entities::contest_entry::EntryStatus;
use photo_contest::entities::user::Role;
use photo_contest::services::entries::{NewContest, UpdateContestEntry};
use photo_contest::services::photos::UpdatePhoto;
use photo_contest::services::StoreError;

use common::{seed_contest, seed_user, setup, submission};

#[tokio::test]
async fn scores_are_summed_and_unvoted_entries_score_zero() {
    let env = setup().await;
    let jane = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let judge_a = seed_user(&env.repo, "Ada Judge", "ada@example.com", Role::Admin).await;
    let judge_b = seed_user(&env.repo, "Bo Judge", "bo@example.com", Role::Admin).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;

    let voted = env.state.pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let unvoted = env.state.pipeline.submit(jane.id, contest.id, submission("Jane Doe", 200, 300)).await.unwrap();

    env.repo.cast_vote(voted.id, judge_a.id, 4).await.unwrap();
    env.repo.cast_vote(voted.id, judge_b.id, 5).await.unwrap();

    let rows = env.repo.list_contest_photos_with_scores(contest.id).await.unwrap();
    assert_eq!(rows.len(), 2);

    let first = rows.iter().find(|r| r.entry_id == voted.id).unwrap();
    assert_eq!(first.score, 9);
    assert_eq!(first.owner_id, jane.id);
    assert_eq!(first.owner_name, "Jane Doe");
    assert_eq!(first.owner_email, "jane@example.com");
    assert!(first.file_path.as_deref().unwrap().ends_with("-small.jpg"));

    let second = rows.iter().find(|r| r.entry_id == unvoted.id).unwrap();
    assert_eq!(second.score, 0);
    assert_eq!(second.status, EntryStatus::Active);
}

#[tokio::test]
async fn revoting_replaces_the_score() {
    let env = setup().await;
    let jane = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let judge = seed_user(&env.repo, "Ada Judge", "ada@example.com", Role::Admin).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let entry = env.state.pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();

    env.repo.cast_vote(entry.id, judge.id, 2).await.unwrap();
    env.repo.cast_vote(entry.id, judge.id, 5).await.unwrap();

    let rows = env.repo.list_contest_photos_with_scores(contest.id).await.unwrap();
    assert_eq!(rows[0].score, 5);

    for bad in [0, 6] {
        assert!(matches!(
            env.repo.cast_vote(entry.id, judge.id, bad).await,
            Err(StoreError::Validation(_))
        ));
    }
    assert!(matches!(env.repo.cast_vote(9999, judge.id, 3).await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn listing_skips_deleted_photos_and_other_contests() {
    let env = setup().await;
    let jane = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let hands = seed_contest(&env.repo, "Working Hands").await;
    let faces = seed_contest(&env.repo, "Faces of the Harbour").await;

    let kept = env.state.pipeline.submit(jane.id, hands.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let deleted = env.state.pipeline.submit(jane.id, hands.id, submission("Jane Doe", 300, 200)).await.unwrap();
    env.state.pipeline.submit(jane.id, faces.id, submission("Jane Doe", 300, 200)).await.unwrap();

    env.repo.delete_photo(deleted.photo_id).await.unwrap();

    let rows = env.repo.list_contest_photos_with_scores(hands.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry_id, kept.id);
}

#[tokio::test]
async fn contest_entries_keep_every_status_but_drop_deleted_photos() {
    let env = setup().await;
    let jane = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let hands = seed_contest(&env.repo, "Working Hands").await;
    let faces = seed_contest(&env.repo, "Faces of the Harbour").await;
    let pipeline = &env.state.pipeline;

    let active = pipeline.submit(jane.id, hands.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let withdrawn = pipeline.submit(jane.id, hands.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let deleted = pipeline.submit(jane.id, hands.id, submission("Jane Doe", 300, 200)).await.unwrap();
    env.repo.withdraw(withdrawn.photo_id, jane.id).await.unwrap();
    env.repo.delete_photo(deleted.photo_id).await.unwrap();
    pipeline.submit(jane.id, faces.id, submission("Jane Doe", 300, 200)).await.unwrap();

    let entries = env.repo.contest_entries(hands.id).await.unwrap();
    let ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![active.id, withdrawn.id]);
    assert_eq!(entries[1].status, EntryStatus::Withdrawn);

    assert!(env.repo.contest_entries(9999).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_changes_show_in_listing_and_gallery() {
    let env = setup().await;
    let jane = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let pipeline = &env.state.pipeline;

    let a = pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let b = pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let c = pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();

    env.repo
        .update_entry(UpdateContestEntry {
            entry_id: b.id,
            status: EntryStatus::Flagged,
            updated_by: "Ada Judge".to_string(),
        })
        .await
        .unwrap();
    env.repo.withdraw(c.photo_id, jane.id).await.unwrap();

    let rows = env.repo.list_contest_photos_with_scores(contest.id).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().find(|r| r.entry_id == b.id).unwrap().status, EntryStatus::Flagged);

    let gallery = env.repo.gallery(contest.id, None).await.unwrap();
    let ids: Vec<i32> = gallery.iter().map(|g| g.entry_id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
    assert!(gallery[0].file_path.as_deref().unwrap().ends_with("-thumb.jpg"));

    let flagged = env.repo.gallery(contest.id, Some(EntryStatus::Flagged)).await.unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].entry_id, b.id);

    let withdrawn = env.repo.gallery(contest.id, Some(EntryStatus::Withdrawn)).await.unwrap();
    assert!(withdrawn.is_empty());
}

#[tokio::test]
async fn my_photos_lists_entries_and_hides_deleted() {
    let env = setup().await;
    let jane = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;

    let entry = env.state.pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();
    let gone = env.state.pipeline.submit(jane.id, contest.id, submission("Jane Doe", 300, 200)).await.unwrap();
    env.repo
        .update_photo(
            gone.photo_id,
            UpdatePhoto {
                deleted: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mine = env.repo.photos_with_entries(jane.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].photo_id, entry.photo_id);
    assert_eq!(mine[0].entry_id, Some(entry.id));
    assert_eq!(mine[0].status, Some(EntryStatus::Active));
    assert!(mine[0].file_path.is_some());
}

#[tokio::test]
async fn contest_slugs_are_derived_and_unique() {
    let env = setup().await;
    let contest = seed_contest(&env.repo, "Faces of the Harbour!").await;
    assert_eq!(contest.slug, "faces-of-the-harbour");
    assert_eq!(
        env.repo.contest_by_slug("faces-of-the-harbour").await.unwrap().map(|c| c.id),
        Some(contest.id)
    );

    let start = Utc::now().naive_utc();
    let duplicate = env
        .repo
        .create_contest(NewContest {
            title: "faces of the harbour".to_string(),
            description: "again".to_string(),
            start_date: start,
            end_date: start + Duration::days(1),
            updated_by: "seed".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

    let backwards = env
        .repo
        .create_contest(NewContest {
            title: "Backwards".to_string(),
            description: "ends before it starts".to_string(),
            start_date: start,
            end_date: start - Duration::days(1),
            updated_by: "seed".to_string(),
        })
        .await;
    assert!(matches!(backwards, Err(StoreError::Validation(_))));
}
