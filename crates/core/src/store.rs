//! Persistence collaborator interface for releases.
//!
//! Defines [`ReleaseStore`], the trait every storage backend implements,
//! plus [`MemoryReleaseStore`], a lock-guarded in-process implementation.
//!
//! Every implementation MUST enforce name uniqueness itself and report a
//! violation as [`StoreError::DuplicateName`]. The directory's existence
//! check is only a fast path in front of that guarantee.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::query::{compare_releases, Predicate, SortOrder};
use crate::release::Release;
use crate::release_status::ReleaseStatus;
use crate::types::ReleaseId;

/// Errors a store can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write would give two releases the same name.
    #[error("Release name already exists: {0}")]
    DuplicateName(String),

    /// Any other backend failure (connection, decode, ...).
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Storage operations the release directory depends on.
pub trait ReleaseStore: Send + Sync {
    /// Whether any release has exactly this name.
    fn exists_by_name(&self, name: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Whether a release other than `id` has exactly this name.
    fn exists_by_name_excluding(
        &self,
        name: &str,
        id: ReleaseId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Insert a new release, returning the stored row.
    fn insert(&self, release: &Release) -> impl Future<Output = Result<Release, StoreError>> + Send;

    fn find_by_id(
        &self,
        id: ReleaseId,
    ) -> impl Future<Output = Result<Option<Release>, StoreError>> + Send;

    /// All releases in `status`, most recently updated first.
    fn find_by_status(
        &self,
        status: ReleaseStatus,
    ) -> impl Future<Output = Result<Vec<Release>, StoreError>> + Send;

    /// One window of releases matching every predicate, plus the total
    /// number of matches ignoring the window.
    fn query_filtered(
        &self,
        predicates: &[Predicate],
        ordering: &[SortOrder],
        offset: i64,
        limit: i64,
    ) -> impl Future<Output = Result<(Vec<Release>, i64), StoreError>> + Send;

    /// Overwrite an existing release. Returns `None` if the id is gone.
    fn save(
        &self,
        release: &Release,
    ) -> impl Future<Output = Result<Option<Release>, StoreError>> + Send;

    /// Remove a release. Returns `true` if a row was removed.
    fn delete(&self, id: ReleaseId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-process [`ReleaseStore`] backed by a `HashMap`.
///
/// Uniqueness is checked under the same write lock as the mutation, so two
/// concurrent inserts of one name cannot both succeed.
#[derive(Debug, Clone, Default)]
pub struct MemoryReleaseStore {
    rows: Arc<RwLock<HashMap<ReleaseId, Release>>>,
}

impl MemoryReleaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored releases.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl ReleaseStore for MemoryReleaseStore {
    async fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.rows.read().await.values().any(|r| r.name == name))
    }

    async fn exists_by_name_excluding(
        &self,
        name: &str,
        id: ReleaseId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .any(|r| r.name == name && r.id != id))
    }

    async fn insert(&self, release: &Release) -> Result<Release, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.values().any(|r| r.name == release.name) {
            return Err(StoreError::DuplicateName(release.name.clone()));
        }
        rows.insert(release.id, release.clone());
        Ok(release.clone())
    }

    async fn find_by_id(&self, id: ReleaseId) -> Result<Option<Release>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_status(&self, status: ReleaseStatus) -> Result<Vec<Release>, StoreError> {
        let mut matching: Vec<Release> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare_releases(&[SortOrder::DEFAULT], a, b));
        Ok(matching)
    }

    async fn query_filtered(
        &self,
        predicates: &[Predicate],
        ordering: &[SortOrder],
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Release>, i64), StoreError> {
        let mut matching: Vec<Release> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| predicates.iter().all(|p| p.matches(r)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare_releases(ordering, a, b));

        let total = matching.len() as i64;
        let window = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((window, total))
    }

    async fn save(&self, release: &Release) -> Result<Option<Release>, StoreError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&release.id) {
            return Ok(None);
        }
        if rows
            .values()
            .any(|r| r.name == release.name && r.id != release.id)
        {
            return Err(StoreError::DuplicateName(release.name.clone()));
        }
        rows.insert(release.id, release.clone());
        Ok(Some(release.clone()))
    }

    async fn delete(&self, id: ReleaseId) -> Result<bool, StoreError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}
