//! Storage-agnostic list query composition.
//!
//! A list request is reduced to a set of [`Predicate`] descriptors, an
//! ordering and an offset/limit window. Stores fold the descriptors into
//! whatever filter expression their engine understands. Absent filter
//! values produce no predicate at all.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::CoreError;
use crate::release::Release;
use crate::release_status::ReleaseStatus;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of releases per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of releases per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page size to valid bounds.
pub fn clamp_size(size: Option<i64>) -> i64 {
    size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a user-provided page index to non-negative.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Fields and predicates
// ---------------------------------------------------------------------------

/// Release fields that can be filtered or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseField {
    Name,
    Status,
    ReleaseDate,
    CreatedAt,
    LastUpdateAt,
}

impl ReleaseField {
    /// Parse the camelCase wire name of a sortable field.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "status" => Some(Self::Status),
            "releaseDate" => Some(Self::ReleaseDate),
            "createdAt" => Some(Self::CreatedAt),
            "lastUpdateAt" => Some(Self::LastUpdateAt),
            _ => None,
        }
    }
}

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Case-insensitive substring match.
    Contains,
    Gte,
    Lte,
}

/// Typed value a predicate compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Status(ReleaseStatus),
    Text(String),
    Date(Date),
}

/// One `(field, operator, value)` filter descriptor.
///
/// Only the supported combinations can be constructed, so every store folds
/// the same set of conditions and none has to skip or reject one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    StatusEq(ReleaseStatus),
    NameContains(String),
    ReleaseDateFrom(Date),
    ReleaseDateTo(Date),
}

impl Predicate {
    /// `status = status`.
    pub fn status_eq(status: ReleaseStatus) -> Self {
        Self {
            condition: Condition::StatusEq(status),
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn name_contains(term: impl Into<String>) -> Self {
        Self {
            condition: Condition::NameContains(term.into()),
        }
    }

    /// `release_date >= from` (inclusive).
    pub fn release_date_from(from: Date) -> Self {
        Self {
            condition: Condition::ReleaseDateFrom(from),
        }
    }

    /// `release_date <= to` (inclusive).
    pub fn release_date_to(to: Date) -> Self {
        Self {
            condition: Condition::ReleaseDateTo(to),
        }
    }

    pub fn field(&self) -> ReleaseField {
        match self.condition {
            Condition::StatusEq(_) => ReleaseField::Status,
            Condition::NameContains(_) => ReleaseField::Name,
            Condition::ReleaseDateFrom(_) | Condition::ReleaseDateTo(_) => {
                ReleaseField::ReleaseDate
            }
        }
    }

    pub fn op(&self) -> FilterOp {
        match self.condition {
            Condition::StatusEq(_) => FilterOp::Eq,
            Condition::NameContains(_) => FilterOp::Contains,
            Condition::ReleaseDateFrom(_) => FilterOp::Gte,
            Condition::ReleaseDateTo(_) => FilterOp::Lte,
        }
    }

    pub fn value(&self) -> FilterValue {
        match &self.condition {
            Condition::StatusEq(status) => FilterValue::Status(*status),
            Condition::NameContains(term) => FilterValue::Text(term.clone()),
            Condition::ReleaseDateFrom(date) | Condition::ReleaseDateTo(date) => {
                FilterValue::Date(*date)
            }
        }
    }

    /// Evaluate the predicate against a release held in memory.
    ///
    /// Range predicates never match a release without a date, mirroring
    /// SQL comparison against `NULL`.
    pub fn matches(&self, release: &Release) -> bool {
        match &self.condition {
            Condition::StatusEq(status) => release.status == *status,
            Condition::NameContains(term) => release
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            Condition::ReleaseDateFrom(from) => release.release_date.is_some_and(|d| d >= *from),
            Condition::ReleaseDateTo(to) => release.release_date.is_some_and(|d| d <= *to),
        }
    }
}

/// Raw list filter as supplied by a caller. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseFilter {
    pub status: Option<String>,
    pub name_contains: Option<String>,
    pub release_date_from: Option<Date>,
    pub release_date_to: Option<Date>,
}

impl ReleaseFilter {
    /// Resolve the filter into predicate descriptors.
    ///
    /// Blank text values are treated as absent. Fails with
    /// [`CoreError::UnknownStatus`] if a status label does not resolve.
    pub fn predicates(&self) -> Result<Vec<Predicate>, CoreError> {
        let mut predicates = Vec::new();

        if let Some(label) = non_blank(self.status.as_deref()) {
            predicates.push(Predicate::status_eq(ReleaseStatus::resolve(label)?));
        }
        if let Some(term) = non_blank(self.name_contains.as_deref()) {
            predicates.push(Predicate::name_contains(term));
        }
        if let Some(from) = self.release_date_from {
            predicates.push(Predicate::release_date_from(from));
        }
        if let Some(to) = self.release_date_to {
            predicates.push(Predicate::release_date_to(to));
        }

        Ok(predicates)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: ReleaseField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Default ordering: most recently touched first.
    pub const DEFAULT: SortOrder = SortOrder {
        field: ReleaseField::LastUpdateAt,
        direction: SortDirection::Desc,
    };

    /// Parse a comma-separated sort expression such as
    /// `releaseDate,desc,name` or `name,asc`.
    ///
    /// Each field may be followed by `asc` or `desc` (default `asc`).
    pub fn parse_list(expr: &str) -> Result<Vec<SortOrder>, CoreError> {
        let mut orders: Vec<SortOrder> = Vec::new();

        for token in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let direction = match token.to_ascii_lowercase().as_str() {
                "asc" => Some(SortDirection::Asc),
                "desc" => Some(SortDirection::Desc),
                _ => None,
            };

            match (direction, orders.last_mut()) {
                (Some(direction), Some(last)) => last.direction = direction,
                (Some(_), None) => {
                    return Err(CoreError::Validation(format!(
                        "Sort direction '{token}' must follow a field"
                    )));
                }
                (None, _) => {
                    let field = ReleaseField::parse(token).ok_or_else(|| {
                        CoreError::Validation(format!("Unknown sort field: {token}"))
                    })?;
                    orders.push(SortOrder {
                        field,
                        direction: SortDirection::Asc,
                    });
                }
            }
        }

        Ok(orders)
    }

    /// Compare two releases on this key. `None` dates sort last ascending.
    pub fn compare(&self, a: &Release, b: &Release) -> Ordering {
        let ordering = match self.field {
            ReleaseField::Name => a.name.cmp(&b.name),
            ReleaseField::Status => a.status.cmp(&b.status),
            ReleaseField::ReleaseDate => match (a.release_date, b.release_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ReleaseField::CreatedAt => a.created_at.cmp(&b.created_at),
            ReleaseField::LastUpdateAt => a.last_update_at.cmp(&b.last_update_at),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Compare two releases on a list of keys, tie-breaking by id.
pub fn compare_releases(orders: &[SortOrder], a: &Release, b: &Release) -> Ordering {
    orders
        .iter()
        .map(|order| order.compare(a, b))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.id.cmp(&b.id))
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Zero-based page request with optional ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Build a page request from raw caller values, clamping both numbers.
    pub fn new(page: Option<i64>, size: Option<i64>, sort: Vec<SortOrder>) -> Self {
        Self {
            page: clamp_page(page),
            size: clamp_size(size),
            sort,
        }
    }

    /// Row offset of the first record on this page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// The caller's ordering, or the default when none was given.
    pub fn effective_sort(&self) -> Vec<SortOrder> {
        if self.sort.is_empty() {
            vec![SortOrder::DEFAULT]
        } else {
            self.sort.clone()
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, Vec::new())
    }
}

/// Paging metadata returned with every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: i64,
    pub number: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

/// One page of results plus the total count of matching records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: PageMetadata,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.size - 1) / request.size
        };
        Self {
            content,
            page: PageMetadata {
                size: request.size,
                number: request.page,
                total_elements,
                total_pages,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
