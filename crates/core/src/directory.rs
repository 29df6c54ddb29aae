//! Release directory: lifecycle rules over a [`ReleaseStore`].
//!
//! The directory holds no state of its own. It resolves status labels,
//! enforces name uniqueness (backed by the store's own constraint), stamps
//! timestamps and applies the auto-complete date rule before delegating to
//! the store.

use chrono::Duration;

use crate::error::CoreError;
use crate::query::{Page, PageRequest, ReleaseFilter};
use crate::release::{Release, ReleaseInput};
use crate::release_status::ReleaseStatus;
use crate::store::ReleaseStore;
use crate::types::{now, today, Date, ReleaseId, Timestamp};

const ENTITY: &str = "Release";

/// Owns release validation, lifecycle transitions and list composition.
#[derive(Debug, Clone)]
pub struct ReleaseDirectory<S> {
    store: S,
}

impl<S: ReleaseStore> ReleaseDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new release.
    ///
    /// Fails with [`CoreError::DuplicateName`] if the name is taken and
    /// [`CoreError::UnknownStatus`] if the label does not resolve.
    pub async fn create(&self, input: ReleaseInput) -> Result<Release, CoreError> {
        tracing::debug!(name = %input.name, "Creating release");

        if self.store.exists_by_name(&input.name).await? {
            tracing::warn!(name = %input.name, "Duplicate release name on create");
            return Err(CoreError::DuplicateName(input.name));
        }

        let status = ReleaseStatus::resolve(&input.status)?;
        let stamped = now();

        let release = Release {
            id: uuid::Uuid::new_v4(),
            name: input.name,
            description: input.description,
            status,
            release_date: auto_complete_date(status, input.release_date),
            created_at: stamped,
            last_update_at: stamped,
        };

        let saved = self.store.insert(&release).await?;
        tracing::info!(release_id = %saved.id, status = %saved.status, "Release created");
        Ok(saved)
    }

    /// Fetch a release by id.
    pub async fn get_by_id(&self, id: ReleaseId) -> Result<Release, CoreError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// List one page of releases matching `filter`.
    ///
    /// Status resolution happens before any store call, so an unknown label
    /// never issues a query.
    pub async fn list(
        &self,
        filter: &ReleaseFilter,
        page: &PageRequest,
    ) -> Result<Page<Release>, CoreError> {
        let predicates = filter.predicates()?;
        let ordering = page.effective_sort();

        let (content, total) = self
            .store
            .query_filtered(&predicates, &ordering, page.offset(), page.size)
            .await?;

        tracing::debug!(
            predicates = predicates.len(),
            returned = content.len(),
            total,
            "Listed releases"
        );
        Ok(Page::new(content, page, total))
    }

    /// Every release in the given status, most recently updated first.
    pub async fn list_by_status(&self, label: &str) -> Result<Vec<Release>, CoreError> {
        let status = ReleaseStatus::resolve(label)?;
        Ok(self.store.find_by_status(status).await?)
    }

    /// Replace name, description, status and release date of a release.
    ///
    /// An absent `release_date` keeps the stored one. `last_update_at`
    /// always moves forward; `created_at` is never touched.
    pub async fn update(&self, id: ReleaseId, input: ReleaseInput) -> Result<Release, CoreError> {
        let existing = self.get_by_id(id).await?;

        if input.name != existing.name
            && self.store.exists_by_name_excluding(&input.name, id).await?
        {
            tracing::warn!(release_id = %id, name = %input.name, "Duplicate release name on update");
            return Err(CoreError::DuplicateName(input.name));
        }

        let status = ReleaseStatus::resolve(&input.status)?;
        let release_date = input.release_date.or(existing.release_date);

        let updated = Release {
            id,
            name: input.name,
            description: input.description,
            status,
            release_date: auto_complete_date(status, release_date),
            created_at: existing.created_at,
            last_update_at: advance(existing.last_update_at),
        };

        let saved = self
            .store
            .save(&updated)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        tracing::info!(
            release_id = %id,
            from = %existing.status,
            to = %saved.status,
            "Release updated"
        );
        Ok(saved)
    }

    /// Permanently remove a release.
    pub async fn delete(&self, id: ReleaseId) -> Result<(), CoreError> {
        self.get_by_id(id).await?;

        if !self.store.delete(id).await? {
            return Err(CoreError::NotFound { entity: ENTITY, id });
        }
        tracing::info!(release_id = %id, "Release deleted");
        Ok(())
    }
}

/// A `Done` release without a date is dated today.
fn auto_complete_date(status: ReleaseStatus, date: Option<Date>) -> Option<Date> {
    match date {
        None if status.is_done() => Some(today()),
        other => other,
    }
}

/// The current time, but always strictly after `previous`.
fn advance(previous: Timestamp) -> Timestamp {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
