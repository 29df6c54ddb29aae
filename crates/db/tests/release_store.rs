//! Integration tests for the PostgreSQL release store.
//!
//! Exercises the repository and the directory against a real database:
//! - Unique name constraint and its classification
//! - Filtered, ordered, paginated queries
//! - Update semantics and timestamp handling
//! - Delete

use assert_matches::assert_matches;
use releasetracker_core::directory::ReleaseDirectory;
use releasetracker_core::error::CoreError;
use releasetracker_core::query::{PageRequest, Predicate, ReleaseFilter, SortOrder};
use releasetracker_core::release::{Release, ReleaseInput};
use releasetracker_core::release_status::ReleaseStatus;
use releasetracker_core::store::{MemoryReleaseStore, ReleaseStore, StoreError};
use releasetracker_core::types::{now, today, Date};
use releasetracker_db::repositories::ReleaseRepo;
use releasetracker_db::PgReleaseStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn directory(pool: PgPool) -> ReleaseDirectory<PgReleaseStore> {
    ReleaseDirectory::new(PgReleaseStore::new(pool))
}

fn input(name: &str, status: &str, release_date: Option<Date>) -> ReleaseInput {
    ReleaseInput {
        name: name.to_string(),
        description: Some("desc".to_string()),
        status: status.to_string(),
        release_date,
    }
}

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

fn raw_release(name: &str) -> Release {
    let ts = now();
    Release {
        id: uuid::Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        status: ReleaseStatus::Created,
        release_date: None,
        created_at: ts,
        last_update_at: ts,
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn status_lookup_table_matches_catalog(pool: PgPool) {
    let rows: Vec<(i16, String)> =
        sqlx::query_as("SELECT id, label FROM release_statuses ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();

    assert_eq!(rows.len(), ReleaseStatus::ALL.len());
    for (status, (id, label)) in ReleaseStatus::ALL.iter().zip(rows) {
        assert_eq!(status.id(), id);
        assert_eq!(status.label(), label);
    }
}

// ---------------------------------------------------------------------------
// Create / uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_round_trips_through_postgres(pool: PgPool) {
    let dir = directory(pool);
    let created = dir
        .create(input("Rel A", "On staging", Some(date(2040, 1, 2))))
        .await
        .unwrap();

    let fetched = dir.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.created_at, fetched.last_update_at);
    assert_eq!(fetched.status, ReleaseStatus::OnStaging);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_name_is_rejected(pool: PgPool) {
    let dir = directory(pool.clone());
    dir.create(input("Rel A", "Created", None)).await.unwrap();

    assert_matches!(
        dir.create(input("Rel A", "Created", None)).await,
        Err(CoreError::DuplicateName(_))
    );
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM releases")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn unique_constraint_is_classified_as_duplicate_name(pool: PgPool) {
    let store = PgReleaseStore::new(pool);
    store.insert(&raw_release("Rel A")).await.unwrap();

    // Bypasses the directory's existence check entirely.
    assert_matches!(
        store.insert(&raw_release("Rel A")).await,
        Err(StoreError::DuplicateName(name)) if name == "Rel A"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn unique_constraint_on_save_is_classified_as_duplicate_name(pool: PgPool) {
    let store = PgReleaseStore::new(pool);
    store.insert(&raw_release("Rel A")).await.unwrap();
    let mut b = store.insert(&raw_release("Rel B")).await.unwrap();

    // Rename B onto A without going through the directory's check.
    b.name = "Rel A".to_string();
    assert_matches!(
        store.save(&b).await,
        Err(StoreError::DuplicateName(name)) if name == "Rel A"
    );

    let stored = store.find_by_id(b.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Rel B");
}

#[sqlx::test(migrations = "./migrations")]
async fn name_uniqueness_is_case_sensitive(pool: PgPool) {
    let dir = directory(pool);
    dir.create(input("Rel A", "Created", None)).await.unwrap();
    assert!(dir.create(input("rel a", "Created", None)).await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
async fn create_done_without_date_sets_today(pool: PgPool) {
    let dir = directory(pool);
    let created = dir.create(input("Rel A", "Done", None)).await.unwrap();
    assert_eq!(created.release_date, Some(today()));
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_defaults_to_last_update_desc(pool: PgPool) {
    let dir = directory(pool);
    dir.create(input("R1", "Created", None)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let r2 = dir.create(input("R2", "Created", None)).await.unwrap();

    let page = dir
        .list(
            &ReleaseFilter::default(),
            &PageRequest::new(Some(0), Some(10), Vec::new()),
        )
        .await
        .unwrap();
    assert_eq!(page.content[0].id, r2.id);
    assert_eq!(page.page.total_elements, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_name_and_date_range(pool: PgPool) {
    let dir = directory(pool);
    dir.create(input("Rel Filter X", "Created", Some(date(2025, 9, 10))))
        .await
        .unwrap();
    dir.create(input("Other", "QA done on STAGING", Some(date(2025, 10, 1))))
        .await
        .unwrap();
    dir.create(input("REL FILTER Y", "Created", Some(date(2025, 9, 30))))
        .await
        .unwrap();
    dir.create(input("Rel Filter Z", "Created", None))
        .await
        .unwrap();

    let filter = ReleaseFilter {
        name_contains: Some("rel fil".into()),
        release_date_from: Some(date(2025, 9, 1)),
        release_date_to: Some(date(2025, 9, 30)),
        ..Default::default()
    };

    let page = dir
        .list(&filter, &PageRequest::new(Some(0), Some(1), Vec::new()))
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.page.total_elements, 2);
    assert_eq!(page.page.total_pages, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_name_filter_treats_wildcards_literally(pool: PgPool) {
    let dir = directory(pool);
    dir.create(input("50% off", "Created", None)).await.unwrap();
    dir.create(input("500 off", "Created", None)).await.unwrap();

    let filter = ReleaseFilter {
        name_contains: Some("0%".into()),
        ..Default::default()
    };
    let page = dir.list(&filter, &PageRequest::default()).await.unwrap();
    assert_eq!(page.page.total_elements, 1);
    assert_eq!(page.content[0].name, "50% off");
}

#[sqlx::test(migrations = "./migrations")]
async fn list_by_status_and_custom_sort(pool: PgPool) {
    let dir = directory(pool);
    for name in ["Charlie", "Alpha", "Bravo"] {
        dir.create(input(name, "On PROD", None)).await.unwrap();
    }
    dir.create(input("Delta", "Created", None)).await.unwrap();

    let filter = ReleaseFilter {
        status: Some("On PROD".into()),
        ..Default::default()
    };
    let sort = SortOrder::parse_list("name,desc").unwrap();
    let page = dir
        .list(&filter, &PageRequest::new(Some(0), Some(10), sort))
        .await
        .unwrap();

    let names: Vec<_> = page.content.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Charlie", "Bravo", "Alpha"]);

    let by_status = dir.list_by_status("Created").await.unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].name, "Delta");
}

#[sqlx::test(migrations = "./migrations")]
async fn page_total_is_reported_past_the_last_page(pool: PgPool) {
    let store = PgReleaseStore::new(pool);
    for name in ["R1", "R2", "R3"] {
        store.insert(&raw_release(name)).await.unwrap();
    }

    let (rows, total) = store
        .query_filtered(&[], &[SortOrder::DEFAULT], 10, 5)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn postgres_and_memory_stores_agree_on_every_predicate(pool: PgPool) {
    let pg = PgReleaseStore::new(pool);
    let memory = MemoryReleaseStore::new();

    let fixtures = [
        ("Rel Alpha", ReleaseStatus::OnDev, Some(date(2030, 1, 10))),
        ("rel beta", ReleaseStatus::Done, Some(date(2030, 2, 1))),
        ("Gamma", ReleaseStatus::OnDev, None),
        ("50% off", ReleaseStatus::Created, Some(date(2030, 1, 31))),
    ];
    for (name, status, release_date) in fixtures {
        let release = Release {
            status,
            release_date,
            ..raw_release(name)
        };
        pg.insert(&release).await.unwrap();
        memory.insert(&release).await.unwrap();
    }

    let cases = [
        vec![Predicate::status_eq(ReleaseStatus::OnDev)],
        vec![Predicate::name_contains("REL")],
        vec![Predicate::name_contains("0%")],
        vec![Predicate::release_date_from(date(2030, 1, 31))],
        vec![Predicate::release_date_to(date(2030, 1, 31))],
        vec![
            Predicate::status_eq(ReleaseStatus::OnDev),
            Predicate::release_date_from(date(2030, 1, 1)),
        ],
    ];
    let ordering = [SortOrder::DEFAULT];

    for predicates in cases {
        let (pg_rows, pg_total) = pg.query_filtered(&predicates, &ordering, 0, 50).await.unwrap();
        let (mem_rows, mem_total) = memory
            .query_filtered(&predicates, &ordering, 0, 50)
            .await
            .unwrap();

        let pg_ids: Vec<_> = pg_rows.iter().map(|r| r.id).collect();
        let mem_ids: Vec<_> = mem_rows.iter().map(|r| r.id).collect();
        assert_eq!(pg_ids, mem_ids, "row mismatch for {predicates:?}");
        assert_eq!(pg_total, mem_total, "total mismatch for {predicates:?}");
        assert!(pg_total > 0, "no rows matched {predicates:?}");
    }
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_advances_last_update_and_keeps_created(pool: PgPool) {
    let dir = directory(pool);
    let created = dir
        .create(input("Rel A", "Created", Some(date(2040, 1, 1))))
        .await
        .unwrap();

    let mut change = input("Rel A", "Created", None);
    change.description = Some("New Desc".into());
    let updated = dir.update(created.id, change).await.unwrap();

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.last_update_at > created.last_update_at);
    assert_eq!(updated.release_date, Some(date(2040, 1, 1)));
    assert_eq!(updated.description.as_deref(), Some("New Desc"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_to_taken_name_conflicts(pool: PgPool) {
    let dir = directory(pool);
    dir.create(input("Rel D", "Created", None)).await.unwrap();
    let e = dir.create(input("Rel E", "Created", None)).await.unwrap();

    assert_matches!(
        dir.update(e.id, input("Rel D", "On DEV", None)).await,
        Err(CoreError::DuplicateName(_))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn repo_update_missing_row_returns_none(pool: PgPool) {
    let result = ReleaseRepo::update(&pool, &raw_release("Ghost")).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_row(pool: PgPool) {
    let dir = directory(pool);
    let created = dir.create(input("Rel A", "Created", None)).await.unwrap();

    dir.delete(created.id).await.unwrap();
    assert_matches!(
        dir.get_by_id(created.id).await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(dir.delete(created.id).await, Err(CoreError::NotFound { .. }));
}
