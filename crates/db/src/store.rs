//! [`ReleaseStore`] backed by PostgreSQL.
//!
//! Name uniqueness is enforced by the `uq_releases_name` constraint; a
//! violation (SQLSTATE `23505`) is reported as [`StoreError::DuplicateName`].

use releasetracker_core::query::{Predicate, SortOrder};
use releasetracker_core::release::Release;
use releasetracker_core::release_status::ReleaseStatus;
use releasetracker_core::store::{ReleaseStore, StoreError};
use releasetracker_core::types::ReleaseId;

use crate::models::release::ReleaseRow;
use crate::repositories::ReleaseRepo;
use crate::DbPool;

/// Unique constraint guarding release names.
pub const NAME_CONSTRAINT: &str = "uq_releases_name";

/// PostgreSQL release store. Cheap to clone (wraps the pool handle).
#[derive(Debug, Clone)]
pub struct PgReleaseStore {
    pool: DbPool,
}

impl PgReleaseStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Whether a sqlx error is a unique violation on the release name.
pub fn is_name_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(NAME_CONSTRAINT)
        }
        _ => false,
    }
}

/// Classify a sqlx error raised while writing `name`.
fn classify_write_error(err: sqlx::Error, name: &str) -> StoreError {
    if is_name_violation(&err) {
        tracing::warn!(name, "Release name unique constraint violated");
        return StoreError::DuplicateName(name.to_string());
    }
    backend(err)
}

fn backend<E: std::error::Error + Send + Sync + 'static>(err: E) -> StoreError {
    StoreError::Backend(Box::new(err))
}

fn into_release(row: ReleaseRow) -> Result<Release, StoreError> {
    Release::try_from(row).map_err(backend)
}

fn into_releases(rows: Vec<ReleaseRow>) -> Result<Vec<Release>, StoreError> {
    rows.into_iter().map(into_release).collect()
}

impl ReleaseStore for PgReleaseStore {
    async fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        ReleaseRepo::exists_by_name(&self.pool, name)
            .await
            .map_err(backend)
    }

    async fn exists_by_name_excluding(
        &self,
        name: &str,
        id: ReleaseId,
    ) -> Result<bool, StoreError> {
        ReleaseRepo::exists_by_name_excluding(&self.pool, name, id)
            .await
            .map_err(backend)
    }

    async fn insert(&self, release: &Release) -> Result<Release, StoreError> {
        let row = ReleaseRepo::create(&self.pool, release)
            .await
            .map_err(|e| classify_write_error(e, &release.name))?;
        into_release(row)
    }

    async fn find_by_id(&self, id: ReleaseId) -> Result<Option<Release>, StoreError> {
        ReleaseRepo::find_by_id(&self.pool, id)
            .await
            .map_err(backend)?
            .map(into_release)
            .transpose()
    }

    async fn find_by_status(&self, status: ReleaseStatus) -> Result<Vec<Release>, StoreError> {
        let rows = ReleaseRepo::find_by_status(&self.pool, status)
            .await
            .map_err(backend)?;
        into_releases(rows)
    }

    async fn query_filtered(
        &self,
        predicates: &[Predicate],
        ordering: &[SortOrder],
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Release>, i64), StoreError> {
        let (rows, total) =
            ReleaseRepo::query_page(&self.pool, predicates, ordering, offset, limit)
                .await
                .map_err(backend)?;
        Ok((into_releases(rows)?, total))
    }

    async fn save(&self, release: &Release) -> Result<Option<Release>, StoreError> {
        ReleaseRepo::update(&self.pool, release)
            .await
            .map_err(|e| classify_write_error(e, &release.name))?
            .map(into_release)
            .transpose()
    }

    async fn delete(&self, id: ReleaseId) -> Result<bool, StoreError> {
        ReleaseRepo::delete(&self.pool, id).await.map_err(backend)
    }
}
