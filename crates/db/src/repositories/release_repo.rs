//! Repository for the `releases` table.

use releasetracker_core::query::{
    FilterOp, FilterValue, Predicate, ReleaseField, SortDirection, SortOrder,
};
use releasetracker_core::release::Release;
use releasetracker_core::release_status::{ReleaseStatus, StatusId};
use releasetracker_core::types::{Date, ReleaseId};
use sqlx::{PgConnection, PgPool};

use crate::models::release::ReleaseRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, status_id, release_date, created_at, last_update_at";

/// Provides CRUD and filtered list queries for releases.
pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Whether a release with exactly this name exists.
    pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM releases WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Whether a release other than `id` has exactly this name.
    pub async fn exists_by_name_excluding(
        pool: &PgPool,
        name: &str,
        id: ReleaseId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM releases WHERE name = $1 AND id <> $2)",
        )
        .bind(name)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Insert a fully-stamped release, returning the stored row.
    pub async fn create(pool: &PgPool, release: &Release) -> Result<ReleaseRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO releases
                (id, name, description, status_id, release_date, created_at, last_update_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(release.id)
            .bind(&release.name)
            .bind(&release.description)
            .bind(release.status.id())
            .bind(release.release_date)
            .bind(release.created_at)
            .bind(release.last_update_at)
            .fetch_one(pool)
            .await
    }

    /// Find a release by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: ReleaseId,
    ) -> Result<Option<ReleaseRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1");
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All releases in one status, most recently updated first.
    pub async fn find_by_status(
        pool: &PgPool,
        status: ReleaseStatus,
    ) -> Result<Vec<ReleaseRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases WHERE status_id = $1 \
             ORDER BY last_update_at DESC, id ASC"
        );
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }

    /// One window of releases matching every predicate, plus the total
    /// number of matches.
    ///
    /// Both statements run in one `REPEATABLE READ` transaction so the total
    /// and the window come from the same snapshot.
    pub async fn query_page(
        pool: &PgPool,
        predicates: &[Predicate],
        ordering: &[SortOrder],
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ReleaseRow>, i64), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = Self::query(&mut *tx, predicates, ordering, offset, limit).await?;
        let total = Self::count(&mut *tx, predicates).await?;

        tx.commit().await?;
        Ok((rows, total))
    }

    async fn query(
        conn: &mut PgConnection,
        predicates: &[Predicate],
        ordering: &[SortOrder],
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ReleaseRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_release_filter(predicates);
        let order_clause = build_order_clause(ordering);

        let query = format!(
            "SELECT {COLUMNS} FROM releases {where_clause} \
             {order_clause} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_release_values(sqlx::query_as::<_, ReleaseRow>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(&mut *conn).await
    }

    async fn count(conn: &mut PgConnection, predicates: &[Predicate]) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_release_filter(predicates);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM releases {where_clause}");

        let q = bind_release_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(&mut *conn).await
    }

    /// Overwrite the mutable columns of a release.
    ///
    /// `created_at` is never written. Returns `None` if no row with the
    /// release's id exists.
    pub async fn update(
        pool: &PgPool,
        release: &Release,
    ) -> Result<Option<ReleaseRow>, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET
                name = $2,
                description = $3,
                status_id = $4,
                release_date = $5,
                last_update_at = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(release.id)
            .bind(&release.name)
            .bind(&release.description)
            .bind(release.status.id())
            .bind(release.release_date)
            .bind(release.last_update_at)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a release by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: ReleaseId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built release queries.
enum BindValue {
    SmallInt(StatusId),
    Text(String),
    Date(Date),
}

fn column(field: ReleaseField) -> &'static str {
    match field {
        ReleaseField::Name => "name",
        ReleaseField::Status => "status_id",
        ReleaseField::ReleaseDate => "release_date",
        ReleaseField::CreatedAt => "created_at",
        ReleaseField::LastUpdateAt => "last_update_at",
    }
}

/// Escape `LIKE` wildcards so a search term only matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Fold predicate descriptors into a WHERE clause and bind values.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if there are no predicates, or starts with `WHERE `.
fn build_release_filter(predicates: &[Predicate]) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for predicate in predicates {
        let col = column(predicate.field());
        let op = predicate.op();
        let condition = match op {
            FilterOp::Eq => format!("{col} = ${bind_idx}"),
            FilterOp::Contains => format!("{col} ILIKE ${bind_idx} ESCAPE '\\'"),
            FilterOp::Gte => format!("{col} >= ${bind_idx}"),
            FilterOp::Lte => format!("{col} <= ${bind_idx}"),
        };
        let value = match (op, predicate.value()) {
            (FilterOp::Contains, FilterValue::Text(term)) => {
                BindValue::Text(format!("%{}%", escape_like(&term)))
            }
            (_, FilterValue::Text(text)) => BindValue::Text(text),
            (_, FilterValue::Status(status)) => BindValue::SmallInt(status.id()),
            (_, FilterValue::Date(date)) => BindValue::Date(date),
        };
        conditions.push(condition);
        bind_values.push(value);
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Build an ORDER BY clause from whitelisted columns, tie-broken by id.
fn build_order_clause(ordering: &[SortOrder]) -> String {
    let mut keys: Vec<String> = ordering
        .iter()
        .map(|order| {
            let dir = match order.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("{} {dir}", column(order.field))
        })
        .collect();
    keys.push("id ASC".to_string());
    format!("ORDER BY {}", keys.join(", "))
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_release_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::SmallInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_release_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::SmallInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
