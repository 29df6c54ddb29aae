/// Release primary keys are PostgreSQL UUIDs generated by the application.
pub type ReleaseId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without a time zone (`YYYY-MM-DD` on the wire).
pub type Date = chrono::NaiveDate;

/// The current UTC timestamp truncated to microseconds.
///
/// PostgreSQL `TIMESTAMPTZ` stores microsecond precision, so stamping with
/// the same precision keeps in-memory and persisted values identical.
pub fn now() -> Timestamp {
    use chrono::SubsecRound;
    chrono::Utc::now().trunc_subsecs(6)
}

/// The current UTC calendar date.
pub fn today() -> Date {
    chrono::Utc::now().date_naive()
}
