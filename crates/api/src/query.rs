//! Query parameter types for the release endpoints.

use releasetracker_core::query::{PageRequest, ReleaseFilter, SortOrder};
use releasetracker_core::types::Date;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// `GET /api/releases` query string.
///
/// ```text
/// ?status=On%20DEV&nameContains=rel&releaseDateFrom=2025-01-01
///  &releaseDateTo=2025-12-31&page=0&size=20&sort=releaseDate,desc,name
/// ```
///
/// Dates arrive as raw strings so a bad value gets the date-format error
/// instead of a generic query rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReleasesParams {
    pub status: Option<String>,
    pub name_contains: Option<String>,
    pub release_date_from: Option<String>,
    pub release_date_to: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl ListReleasesParams {
    pub fn filter(&self) -> AppResult<ReleaseFilter> {
        Ok(ReleaseFilter {
            status: self.status.clone(),
            name_contains: self.name_contains.clone(),
            release_date_from: parse_date(self.release_date_from.as_deref())?,
            release_date_to: parse_date(self.release_date_to.as_deref())?,
        })
    }

    /// Page request with size and page clamped; an absent or blank `sort`
    /// falls back to the default ordering.
    pub fn page_request(&self) -> AppResult<PageRequest> {
        let sort = match self.sort.as_deref() {
            Some(expr) => SortOrder::parse_list(expr)?,
            None => Vec::new(),
        };
        Ok(PageRequest::new(self.page, self.size, sort))
    }
}

fn parse_date(raw: Option<&str>) -> AppResult<Option<Date>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Date::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::invalid_date()),
    }
}
