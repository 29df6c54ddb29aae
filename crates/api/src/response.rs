//! Response payload types that are not domain records.

use releasetracker_core::release_status::{ReleaseStatus, StatusId};
use serde::Serialize;

/// One entry of the status catalog as exposed over HTTP.
#[derive(Debug, Serialize)]
pub struct StatusEntry {
    pub id: StatusId,
    pub label: &'static str,
}

impl From<ReleaseStatus> for StatusEntry {
    fn from(status: ReleaseStatus) -> Self {
        Self {
            id: status.id(),
            label: status.label(),
        }
    }
}
