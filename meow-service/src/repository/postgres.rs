//! PostgreSQL cat store
//!
//! Driver errors are classified into [`StoreError`] by the `From<sqlx::Error>`
//! impl below; every query in this module converts with `?` or `map_err(Into::into)`.

use sqlx::PgPool;

use super::error::StoreError;
use super::pagination::{CatFilter, CatOrder, Pagination};
use super::traits::{CatRepository, StoreResult};
use crate::cats::model::{Cat, CatChanges, NewCat};
use crate::ids::CatId;

const CAT_COLUMNS: &str = "id, name, age, breed, image_url, created_at, updated_at";

/// SQLSTATE codes with a dedicated [`StoreError`] variant
mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const INVALID_TEXT_REPRESENTATION: &str = "22P02";
}

/// Cat store over a shared `PgPool`
#[derive(Debug, Clone)]
pub struct PgCatRepository {
    pool: PgPool,
}

impl PgCatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove every cat, returning how many rows were deleted
    pub async fn delete_all(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM cats").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

impl CatRepository for PgCatRepository {
    const BACKEND: &'static str = "database";

    async fn count(&self, filter: &CatFilter) -> StoreResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cats WHERE ($1::text IS NULL OR breed = $1)")
                .bind(filter.breed.as_deref())
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn find_all(
        &self,
        filter: &CatFilter,
        order: CatOrder,
        pagination: Pagination,
    ) -> StoreResult<Vec<Cat>> {
        // Column and direction come from closed enums, never from input text
        let sql = format!(
            "SELECT {CAT_COLUMNS} FROM cats \
             WHERE ($1::text IS NULL OR breed = $1) \
             ORDER BY {column} {direction} NULLS LAST, id ASC \
             LIMIT $2 OFFSET $3",
            column = order.field.column(),
            direction = order.direction.as_sql(),
        );

        sqlx::query_as::<_, Cat>(&sql)
            .bind(filter.breed.as_deref())
            .bind(i64::try_from(pagination.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(pagination.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn create(&self, cat: NewCat) -> StoreResult<Cat> {
        let sql = format!(
            "INSERT INTO cats (id, name, age, breed, image_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CAT_COLUMNS}"
        );

        sqlx::query_as::<_, Cat>(&sql)
            .bind(String::from(CatId::new()))
            .bind(&cat.name)
            .bind(cat.age)
            .bind(&cat.breed)
            .bind(cat.image_url.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn update(&self, id: &str, changes: CatChanges) -> StoreResult<Cat> {
        let sql = format!(
            "UPDATE cats SET \
               name = COALESCE($2, name), \
               breed = COALESCE($3, breed), \
               age = CASE WHEN $4::boolean THEN $5::integer ELSE age END, \
               image_url = CASE WHEN $6::boolean THEN $7::text ELSE image_url END, \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING {CAT_COLUMNS}"
        );

        sqlx::query_as::<_, Cat>(&sql)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.breed.as_deref())
            .bind(changes.age.is_some())
            .bind(changes.age.flatten())
            .bind(changes.image_url.is_some())
            .bind(changes.image_url.as_ref().and_then(Option::as_deref))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> StoreResult<Cat> {
        let sql = format!("DELETE FROM cats WHERE id = $1 RETURNING {CAT_COLUMNS}");

        sqlx::query_as::<_, Cat>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        match err {
            E::RowNotFound => StoreError::NotFound,
            E::Database(db_err) => classify_sqlstate(
                db_err.code().as_deref(),
                db_err
                    .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                    .and_then(|pg| pg.detail()),
                db_err.message(),
            ),
            other => StoreError::unknown(driver_failure_label(&other), other.to_string()),
        }
    }
}

/// Map a SQLSTATE and its detail text to a [`StoreError`]
fn classify_sqlstate(code: Option<&str>, detail: Option<&str>, message: &str) -> StoreError {
    match code {
        Some(sqlstate::UNIQUE_VIOLATION) => StoreError::UniqueViolation {
            field: detail.and_then(unique_field_from_detail),
        },
        Some(sqlstate::FOREIGN_KEY_VIOLATION) => StoreError::ForeignKeyViolation,
        Some(sqlstate::INVALID_TEXT_REPRESENTATION) => StoreError::InvalidReference,
        Some(code) => StoreError::unknown(code, message),
        None => StoreError::unknown("database", message),
    }
}

/// Extract the API field names from `Key (col[, col])=(...) already exists.`
fn unique_field_from_detail(detail: &str) -> Option<String> {
    let columns = detail.strip_prefix("Key (")?.split_once(")=(")?.0;
    let fields: Vec<&str> = columns
        .split(',')
        .map(|column| api_field_name(column.trim()))
        .filter(|field| !field.is_empty())
        .collect();

    (!fields.is_empty()).then(|| fields.join(","))
}

/// API name for a `cats` column
fn api_field_name(column: &str) -> &str {
    match column {
        "image_url" => "imageUrl",
        "created_at" => "createdAt",
        "updated_at" => "updatedAt",
        other => other,
    }
}

/// Label for driver failures that carry no SQLSTATE
fn driver_failure_label(err: &sqlx::Error) -> &'static str {
    use sqlx::Error as E;
    match err {
        E::Configuration(_) => "configuration",
        E::Io(_) => "io",
        E::Tls(_) => "tls",
        E::Protocol(_) => "protocol",
        E::PoolTimedOut => "pool_timed_out",
        E::PoolClosed => "pool_closed",
        E::WorkerCrashed => "worker_crashed",
        E::ColumnNotFound(_) | E::ColumnIndexOutOfBounds { .. } => "column",
        E::ColumnDecode { .. } | E::Decode(_) | E::TypeNotFound { .. } => "decode",
        _ => "driver",
    }
}
