use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Dispatcher, DispatcherInput, PageQuery};
use crate::validation::normalize;

#[derive(Clone)]
pub struct DispatcherRepository {
    pool: SqlitePool,
}

impl DispatcherRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<(Vec<Dispatcher>, i64)> {
        let pattern = query.search_pattern();

        let dispatchers = sqlx::query_as::<_, Dispatcher>(
            r#"
            SELECT id, name, email, phone, address, commission_percent, created_at, updated_at
            FROM dispatchers
            WHERE ?1 IS NULL
                OR name LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
                OR phone LIKE ?1 ESCAPE '\'
            ORDER BY name, id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(&pattern)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM dispatchers
            WHERE ?1 IS NULL
                OR name LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
                OR phone LIKE ?1 ESCAPE '\'
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((dispatchers, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Dispatcher>> {
        let dispatcher = sqlx::query_as::<_, Dispatcher>(
            "SELECT id, name, email, phone, address, commission_percent, created_at, updated_at FROM dispatchers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dispatcher)
    }

    pub async fn create(&self, input: DispatcherInput) -> Result<Dispatcher> {
        let now = Utc::now();
        let dispatcher = sqlx::query_as::<_, Dispatcher>(
            r#"
            INSERT INTO dispatchers (name, email, phone, address, commission_percent, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, name, email, phone, address, commission_percent, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize(input.email))
        .bind(normalize(input.phone))
        .bind(normalize(input.address))
        .bind(input.commission_percent)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(dispatcher)
    }

    pub async fn update(&self, id: i64, input: DispatcherInput) -> Result<Option<Dispatcher>> {
        let dispatcher = sqlx::query_as::<_, Dispatcher>(
            r#"
            UPDATE dispatchers
            SET name = ?1, email = ?2, phone = ?3, address = ?4, commission_percent = ?5, updated_at = ?6
            WHERE id = ?7
            RETURNING id, name, email, phone, address, commission_percent, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize(input.email))
        .bind(normalize(input.phone))
        .bind(normalize(input.address))
        .bind(input.commission_percent)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dispatcher)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dispatchers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
