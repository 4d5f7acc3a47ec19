//! Integration tests for `PgRecordStore`: verification at the trust
//! boundary, immutability, and day/guard listing.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use guardpost_core::checkpoint::Checklist;
use guardpost_core::clock::{Clock, ManualClock};
use guardpost_core::geo::Coordinate;
use guardpost_core::store::{CheckInCandidate, RecordStore, Rejection, StoreError};
use guardpost_db::models::checkpoint::CreateCheckpoint;
use guardpost_db::models::guard::CreateGuard;
use guardpost_db::repositories::{CheckpointRepo, GuardRepo, PatrolRecordRepo};
use guardpost_db::PgRecordStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HQ: Coordinate = Coordinate::new(40.7128, -74.0060);

struct Fixture {
    store: PgRecordStore,
    clock: Arc<ManualClock>,
    guard_id: i64,
    checkpoint_id: i64,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let guard = GuardRepo::create(
        pool,
        &CreateGuard {
            username: "guard1".to_string(),
            name: "John Smith".to_string(),
            password: "guard123".to_string(),
            },
    )
    .await
    .unwrap();
    let checkpoint = CheckpointRepo::create(
        pool,
        &CreateCheckpoint {
            name: "Main Entrance".to_string(),
            latitude: HQ.latitude,
            longitude: HQ.longitude,
            checklist: vec!["Door locked".to_string(), "Lights off".to_string()],
        },
    )
    .await
    .unwrap();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap(),
    ));
    Fixture {
        store: PgRecordStore::with_clock(pool.clone(), clock.clone()),
        clock,
        guard_id: guard.id,
        checkpoint_id: checkpoint.id,
    }
}

fn all_done() -> Checklist {
    [("Door locked", true), ("Lights off", true)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn candidate(f: &Fixture, position: Coordinate) -> CheckInCandidate {
    CheckInCandidate {
        guard_id: f.guard_id,
        checkpoint_id: f.checkpoint_id,
        position,
        checklist: all_done(),
        photo_url: None,
    }
}

async fn count(pool: &PgPool) -> i64 {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patrol_records")
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

// ---------------------------------------------------------------------------
// Append
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_append_at_checkpoint(pool: PgPool) {
    let f = fixture(&pool).await;
    let record = f.store.append(candidate(&f, HQ)).await.unwrap();

    assert_eq!(record.distance_m, 0.0);
    assert_eq!(record.guard_name, "John Smith");
    assert_eq!(record.checkpoint_name, "Main Entrance");
    assert_eq!(record.created_at, f.clock.now());
    assert_eq!(record.checklist, all_done());
    let keys: Vec<&str> = record.checklist.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Door locked", "Lights off"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_far_candidate_rejected_without_write(pool: PgPool) {
    let f = fixture(&pool).await;
    let far = Coordinate::new(HQ.latitude + 0.0017987, HQ.longitude);

    let err = f.store.append(candidate(&f, far)).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Rejected(Rejection::OutOfRange { distance_m, .. })
            if (distance_m - 200.0).abs() <= 10.0
    );
    assert_eq!(count(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_incomplete_checklist_rejected(pool: PgPool) {
    let f = fixture(&pool).await;
    let mut input = candidate(&f, HQ);
    input.checklist.insert("Lights off".to_string(), false);

    let err = f.store.append(input).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Rejected(Rejection::IncompleteChecklist {
            missing: vec!["Lights off".to_string()]
        })
    );
    assert_eq!(count(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_and_deleted_references_rejected(pool: PgPool) {
    let f = fixture(&pool).await;

    let mut input = candidate(&f, HQ);
    input.guard_id = 9_999;
    assert_eq!(
        f.store.append(input).await.unwrap_err(),
        StoreError::Rejected(Rejection::GuardNotFound(9_999))
    );

    CheckpointRepo::soft_delete(&pool, f.checkpoint_id)
        .await
        .unwrap();
    assert_eq!(
        f.store.append(candidate(&f, HQ)).await.unwrap_err(),
        StoreError::Rejected(Rejection::CheckpointNotFound(f.checkpoint_id))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_appends_produce_distinct_records(pool: PgPool) {
    let f = fixture(&pool).await;

    let (a, b) = tokio::join!(
        f.store.append(candidate(&f, HQ)),
        f.store.append(candidate(&f, HQ))
    );
    assert_ne!(a.unwrap().id, b.unwrap().id);
    assert_eq!(count(&pool).await, 2);
}

// ---------------------------------------------------------------------------
// Immutability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_records_cannot_be_updated_or_deleted(pool: PgPool) {
    let f = fixture(&pool).await;
    let record = f.store.append(candidate(&f, HQ)).await.unwrap();

    let update = sqlx::query("UPDATE patrol_records SET distance_m = 0 WHERE id = $1")
        .bind(record.id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "UPDATE should be rejected");

    let delete = sqlx::query("DELETE FROM patrol_records WHERE id = $1")
        .bind(record.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "DELETE should be rejected");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_checkpoint_edit_leaves_history_untouched(pool: PgPool) {
    let f = fixture(&pool).await;
    let record = f.store.append(candidate(&f, HQ)).await.unwrap();

    sqlx::query("UPDATE checkpoints SET name = 'Renamed', latitude = 0 WHERE id = $1")
        .bind(f.checkpoint_id)
        .execute(&pool)
        .await
        .unwrap();
    CheckpointRepo::soft_delete(&pool, f.checkpoint_id)
        .await
        .unwrap();

    let row = PatrolRecordRepo::find_by_id(&pool, record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.checkpoint_name, "Main Entrance");
    assert_eq!(row.checkpoint_latitude, HQ.latitude);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_listing_by_utc_day_and_guard(pool: PgPool) {
    let f = fixture(&pool).await;
    let first = f.store.append(candidate(&f, HQ)).await.unwrap();
    // 00:30 the next day.
    f.clock.advance(Duration::hours(1));
    let second = f.store.append(candidate(&f, HQ)).await.unwrap();

    let day = first.created_at.date_naive();
    assert_eq!(f.store.list_by_date(day).await.unwrap(), vec![first.clone()]);
    assert_eq!(
        f.store
            .list_by_guard_and_date(f.guard_id, day.succ_opt().unwrap())
            .await
            .unwrap(),
        vec![second]
    );
    assert!(f
        .store
        .list_by_guard_and_date(f.guard_id + 1, day)
        .await
        .unwrap()
        .is_empty());
}
