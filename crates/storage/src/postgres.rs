//! Warning and region persistence using PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use alert_common::{AlertError, AlertResult, StoredWarning, Warning};

use crate::store::{UpsertOutcome, WarningStore};

/// Database connection pool and warning/region operations.
pub struct WarningCatalog {
    pool: PgPool,
}

impl WarningCatalog {
    /// Create a new catalog connection from database URL.
    pub async fn connect(database_url: &str) -> AlertResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| AlertError::DatabaseError(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> AlertResult<()> {
        // Split SQL statements and execute them individually
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| AlertError::DatabaseError(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }

    /// Cheap connectivity probe for readiness checks.
    pub async fn ping(&self) -> AlertResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AlertError::DatabaseError(format!("Ping failed: {}", e)))?;
        Ok(())
    }

    /// Insert or replace a region boundary by code.
    pub async fn replace_region(
        &self,
        code: &str,
        name: &str,
        boundary: &serde_json::Value,
    ) -> AlertResult<()> {
        sqlx::query(
            r#"
            INSERT INTO regions (code, name, boundary, imported_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (code)
            DO UPDATE SET
                name = EXCLUDED.name,
                boundary = EXCLUDED.boundary,
                imported_at = EXCLUDED.imported_at
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(boundary)
        .execute(&self.pool)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Region upsert failed: {}", e)))?;

        Ok(())
    }

    /// Load all region rows, ordered by code.
    ///
    /// Code order is the index load order, which keeps shared-edge
    /// tie-breaks stable across restarts and re-imports.
    pub async fn load_regions(&self) -> AlertResult<Vec<RegionRow>> {
        let rows = sqlx::query_as::<_, RegionRow>(
            "SELECT code, name, boundary FROM regions ORDER BY code ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows)
    }
}

#[async_trait]
impl WarningStore for WarningCatalog {
    async fn upsert_by_stable_id(
        &self,
        stable_id: &str,
        record: &Warning,
    ) -> AlertResult<UpsertOutcome> {
        // Single conditional write on the unique constraint; xmax = 0 only
        // on freshly inserted rows.
        let created = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO warnings (
                stable_id, title, level, probability,
                start_at, end_at, published_at,
                description, comment, office, area_codes, raw, fetched_at
            ) VALUES (
                $1, $2, $3, $4,
                $5, $6, $7,
                $8, $9, $10, $11, $12, NOW()
            )
            ON CONFLICT (stable_id)
            DO UPDATE SET
                title = EXCLUDED.title,
                level = EXCLUDED.level,
                probability = EXCLUDED.probability,
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                published_at = EXCLUDED.published_at,
                description = EXCLUDED.description,
                comment = EXCLUDED.comment,
                office = EXCLUDED.office,
                area_codes = EXCLUDED.area_codes,
                raw = EXCLUDED.raw,
                fetched_at = EXCLUDED.fetched_at
            RETURNING (xmax = 0) AS created
            "#,
        )
        .bind(stable_id)
        .bind(&record.title)
        .bind(&record.level)
        .bind(record.probability)
        .bind(record.start)
        .bind(record.end)
        .bind(record.published)
        .bind(&record.description)
        .bind(&record.comment)
        .bind(&record.office)
        .bind(serde_json::to_value(&record.area_codes)?)
        .bind(&record.raw)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Upsert failed: {}", e)))?;

        Ok(UpsertOutcome { created })
    }

    async fn upsert_by_fallback(&self, record: &Warning) -> AlertResult<UpsertOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AlertError::DatabaseError(format!("Transaction failed: {}", e)))?;

        // Overwrite the oldest row carrying the (title, start) pair
        let updated = sqlx::query(
            r#"
            UPDATE warnings SET
                stable_id = $1,
                title = $2,
                level = $3,
                probability = $4,
                start_at = $5,
                end_at = $6,
                published_at = $7,
                description = $8,
                comment = $9,
                office = $10,
                area_codes = $11,
                raw = $12,
                fetched_at = NOW()
            WHERE id = (
                SELECT id FROM warnings
                WHERE title = $2 AND start_at IS NOT DISTINCT FROM $5
                ORDER BY id ASC
                LIMIT 1
            )
            "#,
        )
        .bind(&record.stable_id)
        .bind(&record.title)
        .bind(&record.level)
        .bind(record.probability)
        .bind(record.start)
        .bind(record.end)
        .bind(record.published)
        .bind(&record.description)
        .bind(&record.comment)
        .bind(&record.office)
        .bind(serde_json::to_value(&record.area_codes)?)
        .bind(&record.raw)
        .execute(&mut *tx)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Update failed: {}", e)))?
        .rows_affected();

        let created = if updated == 0 {
            sqlx::query(
                r#"
                INSERT INTO warnings (
                    stable_id, title, level, probability,
                    start_at, end_at, published_at,
                    description, comment, office, area_codes, raw, fetched_at
                ) VALUES (
                    $1, $2, $3, $4,
                    $5, $6, $7,
                    $8, $9, $10, $11, $12, NOW()
                )
                "#,
            )
            .bind(&record.stable_id)
            .bind(&record.title)
            .bind(&record.level)
            .bind(record.probability)
            .bind(record.start)
            .bind(record.end)
            .bind(record.published)
            .bind(&record.description)
            .bind(&record.comment)
            .bind(&record.office)
            .bind(serde_json::to_value(&record.area_codes)?)
            .bind(&record.raw)
            .execute(&mut *tx)
            .await
            .map_err(|e| AlertError::DatabaseError(format!("Insert failed: {}", e)))?;
            true
        } else {
            false
        };

        tx.commit()
            .await
            .map_err(|e| AlertError::DatabaseError(format!("Commit failed: {}", e)))?;

        Ok(UpsertOutcome { created })
    }

    async fn active_for(
        &self,
        code: &str,
        as_of: DateTime<Utc>,
    ) -> AlertResult<Vec<StoredWarning>> {
        let rows = sqlx::query_as::<_, WarningRow>(
            "SELECT id, stable_id, title, level, probability, \
             start_at, end_at, published_at, \
             description, comment, office, area_codes, raw, fetched_at \
             FROM warnings \
             WHERE area_codes @> $1 AND start_at <= $2 AND end_at >= $2 \
             ORDER BY start_at DESC, id ASC",
        )
        .bind(serde_json::json!([code]))
        .bind(as_of)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list(&self, limit: i64, offset: i64) -> AlertResult<Vec<StoredWarning>> {
        let rows = sqlx::query_as::<_, WarningRow>(
            "SELECT id, stable_id, title, level, probability, \
             start_at, end_at, published_at, \
             description, comment, office, area_codes, raw, fetched_at \
             FROM warnings \
             ORDER BY start_at DESC NULLS LAST, id ASC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count(&self) -> AlertResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warnings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AlertError::DatabaseError(format!("Query failed: {}", e)))
    }

    async fn get(&self, id: i64) -> AlertResult<Option<StoredWarning>> {
        let row = sqlx::query_as::<_, WarningRow>(
            "SELECT id, stable_id, title, level, probability, \
             start_at, end_at, published_at, \
             description, comment, office, area_codes, raw, fetched_at \
             FROM warnings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AlertError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }
}

/// A stored region boundary row.
#[derive(Debug, Clone, FromRow)]
pub struct RegionRow {
    pub code: String,
    pub name: String,
    /// GeoJSON MultiPolygon in the projected CRS.
    pub boundary: serde_json::Value,
}

/// Internal row type for warning queries.
#[derive(FromRow)]
struct WarningRow {
    id: i64,
    stable_id: Option<String>,
    title: String,
    level: Option<String>,
    probability: i16,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    published_at: Option<DateTime<Utc>>,
    description: Option<String>,
    comment: String,
    office: String,
    area_codes: serde_json::Value,
    raw: serde_json::Value,
    fetched_at: DateTime<Utc>,
}

impl From<WarningRow> for StoredWarning {
    fn from(row: WarningRow) -> Self {
        StoredWarning {
            id: row.id,
            record: Warning {
                stable_id: row.stable_id,
                title: row.title,
                level: row.level,
                probability: row.probability,
                start: row.start_at,
                end: row.end_at,
                published: row.published_at,
                description: row.description,
                comment: row.comment,
                office: row.office,
                area_codes: serde_json::from_value(row.area_codes).unwrap_or_default(),
                raw: row.raw,
            },
            fetched_at: row.fetched_at,
        }
    }
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS warnings (
    id BIGSERIAL PRIMARY KEY,
    stable_id TEXT UNIQUE,
    title TEXT NOT NULL,
    level TEXT,
    probability SMALLINT NOT NULL DEFAULT 0,
    start_at TIMESTAMPTZ,
    end_at TIMESTAMPTZ,
    published_at TIMESTAMPTZ,
    description TEXT,
    comment TEXT NOT NULL DEFAULT '',
    office TEXT NOT NULL DEFAULT '',
    area_codes JSONB NOT NULL DEFAULT '[]',
    raw JSONB NOT NULL,
    fetched_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_warnings_window ON warnings(start_at, end_at);
CREATE INDEX IF NOT EXISTS idx_warnings_area_codes ON warnings USING GIN (area_codes);
CREATE INDEX IF NOT EXISTS idx_warnings_fallback ON warnings(title, start_at);

CREATE TABLE IF NOT EXISTS regions (
    code VARCHAR(8) PRIMARY KEY,
    name TEXT NOT NULL,
    boundary JSONB NOT NULL,
    imported_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;
