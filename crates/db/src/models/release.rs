//! Release row model.

use releasetracker_core::release::Release;
use releasetracker_core::release_status::{ReleaseStatus, StatusId};
use releasetracker_core::types::{Date, ReleaseId, Timestamp};
use sqlx::FromRow;

/// A row from the `releases` table.
#[derive(Debug, Clone, FromRow)]
pub struct ReleaseRow {
    pub id: ReleaseId,
    pub name: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub release_date: Option<Date>,
    pub created_at: Timestamp,
    pub last_update_at: Timestamp,
}

/// A `status_id` with no matching [`ReleaseStatus`] variant.
#[derive(Debug, thiserror::Error)]
#[error("Unknown release status id: {0}")]
pub struct UnknownStatusId(pub StatusId);

impl TryFrom<ReleaseRow> for Release {
    type Error = UnknownStatusId;

    fn try_from(row: ReleaseRow) -> Result<Self, Self::Error> {
        let status = ReleaseStatus::from_id(row.status_id).ok_or(UnknownStatusId(row.status_id))?;
        Ok(Release {
            id: row.id,
            name: row.name,
            description: row.description,
            status,
            release_date: row.release_date,
            created_at: row.created_at,
            last_update_at: row.last_update_at,
        })
    }
}
