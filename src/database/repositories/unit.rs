use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{PageQuery, Unit, UnitInput};
use crate::validation::normalize;

#[derive(Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
}

impl UnitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<(Vec<Unit>, i64)> {
        let pattern = query.search_pattern();

        let units = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, unit_number, plate_number, vin, make, model, year, created_at, updated_at
            FROM units
            WHERE ?1 IS NULL
                OR unit_number LIKE ?1 ESCAPE '\'
                OR plate_number LIKE ?1 ESCAPE '\'
                OR vin LIKE ?1 ESCAPE '\'
                OR make LIKE ?1 ESCAPE '\'
            ORDER BY unit_number, id
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
            FROM units
            WHERE ?1 IS NULL
                OR unit_number LIKE ?1 ESCAPE '\'
                OR plate_number LIKE ?1 ESCAPE '\'
                OR vin LIKE ?1 ESCAPE '\'
                OR make LIKE ?1 ESCAPE '\'
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((units, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(
            "SELECT id, unit_number, plate_number, vin, make, model, year, created_at, updated_at FROM units WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    pub async fn create(&self, input: UnitInput) -> Result<Unit> {
        let now = Utc::now();
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (unit_number, plate_number, vin, make, model, year, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING id, unit_number, plate_number, vin, make, model, year, created_at, updated_at
            "#,
        )
        .bind(input.unit_number.trim())
        .bind(normalize(input.plate_number))
        .bind(normalize(input.vin))
        .bind(normalize(input.make))
        .bind(normalize(input.model))
        .bind(input.year)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(unit)
    }

    pub async fn update(&self, id: i64, input: UnitInput) -> Result<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET unit_number = ?1, plate_number = ?2, vin = ?3, make = ?4, model = ?5, year = ?6,
                updated_at = ?7
            WHERE id = ?8
            RETURNING id, unit_number, plate_number, vin, make, model, year, created_at, updated_at
            "#,
        )
        .bind(input.unit_number.trim())
        .bind(normalize(input.plate_number))
        .bind(normalize(input.vin))
        .bind(normalize(input.make))
        .bind(normalize(input.model))
        .bind(input.year)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM units WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
