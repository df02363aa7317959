//! Storage-level streak behavior against a real SQLite database.

use chrono::NaiveDate;
use smiled::storage::Storage;
use smiled::streaks::{storage::StreakStorage, StreakDomain};
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn make_storage(dir: &TempDir) -> StreakStorage {
    let storage = Storage::new(dir.path()).await.unwrap();
    StreakStorage::new(storage.pool())
}

#[tokio::test]
async fn consecutive_days_grow_the_streak() {
    let dir = TempDir::new().unwrap();
    let streaks = make_storage(&dir).await;

    for d in 1..=5 {
        streaks
            .record_activity("u1", StreakDomain::Meditation, day(2026, 3, d))
            .await
            .unwrap();
    }

    let record = streaks.get("u1", StreakDomain::Meditation).await.unwrap();
    assert_eq!(record.current_streak, 5);
    assert_eq!(record.longest_streak, 5);
    assert_eq!(record.total_completed, 5);
}

#[tokio::test]
async fn a_gap_resets_current_but_keeps_longest() {
    let dir = TempDir::new().unwrap();
    let streaks = make_storage(&dir).await;

    streaks
        .record_activity("u1", StreakDomain::Activity, day(2026, 3, 1))
        .await
        .unwrap();
    streaks
        .record_activity("u1", StreakDomain::Activity, day(2026, 3, 2))
        .await
        .unwrap();
    streaks
        .record_activity("u1", StreakDomain::Activity, day(2026, 3, 3))
        .await
        .unwrap();
    // Three days skipped.
    let record = streaks
        .record_activity("u1", StreakDomain::Activity, day(2026, 3, 7))
        .await
        .unwrap();

    assert_eq!(record.current_streak, 1);
    assert_eq!(record.longest_streak, 3);
    assert_eq!(record.total_completed, 4);
}

#[tokio::test]
async fn same_day_repeats_count_completions_but_not_streak() {
    let dir = TempDir::new().unwrap();
    let streaks = make_storage(&dir).await;

    streaks
        .record_activity("u1", StreakDomain::Journey, day(2026, 3, 1))
        .await
        .unwrap();
    streaks
        .record_activity("u1", StreakDomain::Journey, day(2026, 3, 2))
        .await
        .unwrap();
    let record = streaks
        .record_activity("u1", StreakDomain::Journey, day(2026, 3, 2))
        .await
        .unwrap();

    assert_eq!(record.current_streak, 2);
    assert_eq!(record.total_completed, 3);
}

#[tokio::test]
async fn domains_track_independently() {
    let dir = TempDir::new().unwrap();
    let streaks = make_storage(&dir).await;

    streaks
        .record_activity("u1", StreakDomain::Meditation, day(2026, 3, 1))
        .await
        .unwrap();
    streaks
        .record_activity("u1", StreakDomain::Meditation, day(2026, 3, 2))
        .await
        .unwrap();
    streaks
        .record_activity("u1", StreakDomain::Activity, day(2026, 3, 2))
        .await
        .unwrap();

    let meditation = streaks.get("u1", StreakDomain::Meditation).await.unwrap();
    let activity = streaks.get("u1", StreakDomain::Activity).await.unwrap();
    assert_eq!(meditation.current_streak, 2);
    assert_eq!(activity.current_streak, 1);
}

#[tokio::test]
async fn reading_never_mutates() {
    let dir = TempDir::new().unwrap();
    let streaks = make_storage(&dir).await;

    streaks
        .record_activity("u1", StreakDomain::Meditation, day(2026, 3, 1))
        .await
        .unwrap();

    let first = streaks.get("u1", StreakDomain::Meditation).await.unwrap();
    let second = streaks.get("u1", StreakDomain::Meditation).await.unwrap();
    assert_eq!(first.current_streak, second.current_streak);
    assert_eq!(first.total_completed, second.total_completed);

    // Unknown user reads as a zeroed record, and no row is created.
    let empty = streaks.get("ghost", StreakDomain::Activity).await.unwrap();
    assert_eq!(empty.current_streak, 0);
    assert_eq!(empty.last_activity_date, None);
    let again = streaks.get("ghost", StreakDomain::Activity).await.unwrap();
    assert_eq!(again.current_streak, 0);
}

#[tokio::test]
async fn streaks_survive_a_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let streaks = make_storage(&dir).await;
        streaks
            .record_activity("u1", StreakDomain::Meditation, day(2026, 3, 1))
            .await
            .unwrap();
        streaks
            .record_activity("u1", StreakDomain::Meditation, day(2026, 3, 2))
            .await
            .unwrap();
    }

    let reopened = make_storage(&dir).await;
    let record = reopened.get("u1", StreakDomain::Meditation).await.unwrap();
    assert_eq!(record.current_streak, 2);
    assert_eq!(record.last_activity_date, Some(day(2026, 3, 2)));
}
