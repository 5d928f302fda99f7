use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{ListOptions, Record, Result, StoreError, store::Store};

/// PostgreSQL-backed document store implementation.
///
/// Documents live in a single `documents` table keyed by `(namespace, id)`
/// with the body stored as JSONB.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<Record> {
        Ok(Record {
            namespace: row.try_get("namespace")?,
            id: row.try_get("id")?,
            parent: row.try_get("parent")?,
            created: row.try_get("created")?,
            updated: row.try_get("updated")?,
            body: row.try_get("body")?,
        })
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn get_record(&self, namespace: &str, id: &str) -> Result<Record> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT namespace, id, parent, created, updated, body
            FROM documents
            WHERE namespace = $1 AND id = $2
            "#,
        )
        .bind(namespace)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_record(row),
            None => Err(StoreError::NotFound {
                namespace: namespace.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn put_record(&self, record: Record) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (namespace, id, parent, created, updated, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (namespace, id) DO UPDATE SET
                parent = EXCLUDED.parent,
                created = EXCLUDED.created,
                updated = EXCLUDED.updated,
                body = EXCLUDED.body
            "#,
        )
        .bind(&record.namespace)
        .bind(&record.id)
        .bind(&record.parent)
        .bind(record.created)
        .bind(record.updated)
        .bind(&record.body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_record(&self, record: Record) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET parent = $3, updated = $4, body = $5
            WHERE namespace = $1 AND id = $2
            "#,
        )
        .bind(&record.namespace)
        .bind(&record.id)
        .bind(&record.parent)
        .bind(record.updated)
        .bind(&record.body)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                namespace: record.namespace,
                id: record.id,
            });
        }
        Ok(())
    }

    async fn list_records(&self, namespace: &str, options: &ListOptions) -> Result<Vec<Record>> {
        // Column and direction come from closed enums, never from user input.
        let direction = if options.sort.descending { "DESC" } else { "ASC" };
        let sql = format!(
            "SELECT namespace, id, parent, created, updated, body FROM documents \
             WHERE namespace = $1 ORDER BY {column} {direction}, id {direction} \
             LIMIT $2 OFFSET $3",
            column = options.sort.field.column(),
        );

        let rows = sqlx::query(&sql)
            .bind(namespace)
            .bind(options.limit as i64)
            .bind(options.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn list_records_by_parent(&self, namespace: &str, parent: &str) -> Result<Vec<Record>> {
        let rows = sqlx::query(
            r#"
            SELECT namespace, id, parent, created, updated, body
            FROM documents
            WHERE namespace = $1 AND parent = $2
            ORDER BY created ASC, id ASC
            "#,
        )
        .bind(namespace)
        .bind(parent)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }
}
