use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::database::models::{
    DispatchType, Driver, DriverInput, DriverRate, DriverRateInput, PageQuery,
};
use crate::validation::normalize;

/// A job joined with the driver's rate for its type, for earnings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DriverJobRow {
    pub job_id: i64,
    pub job_date: NaiveDate,
    pub job_type_title: String,
    pub dispatch_type: DispatchType,
    pub hours: Option<f64>,
    pub loads: Option<i64>,
    pub weight: Option<f64>,
    pub driver_rate: Option<f64>,
}

#[derive(Clone)]
pub struct DriverRepository {
    pool: SqlitePool,
}

impl DriverRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<(Vec<Driver>, i64)> {
        let pattern = query.search_pattern();

        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, name, email, phone, address, license_number, created_at, updated_at
            FROM drivers
            WHERE ?1 IS NULL
                OR name LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
                OR phone LIKE ?1 ESCAPE '\'
                OR license_number LIKE ?1 ESCAPE '\'
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
            FROM drivers
            WHERE ?1 IS NULL
                OR name LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
                OR phone LIKE ?1 ESCAPE '\'
                OR license_number LIKE ?1 ESCAPE '\'
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((drivers, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            "SELECT id, name, email, phone, address, license_number, created_at, updated_at FROM drivers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn create(&self, input: DriverInput) -> Result<Driver> {
        let now = Utc::now();
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (name, email, phone, address, license_number, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, name, email, phone, address, license_number, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize(input.email))
        .bind(normalize(input.phone))
        .bind(normalize(input.address))
        .bind(normalize(input.license_number))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn update(&self, id: i64, input: DriverInput) -> Result<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = ?1, email = ?2, phone = ?3, address = ?4, license_number = ?5, updated_at = ?6
            WHERE id = ?7
            RETURNING id, name, email, phone, address, license_number, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize(input.email))
        .bind(normalize(input.phone))
        .bind(normalize(input.address))
        .bind(normalize(input.license_number))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Driver rates
    pub async fn get_rates(&self, driver_id: i64) -> Result<Vec<DriverRate>> {
        let rates = sqlx::query_as::<_, DriverRate>(
            r#"
            SELECT dr.id, dr.driver_id, dr.job_type_id, jt.title AS job_type_title, dr.rate,
                dr.created_at, dr.updated_at
            FROM driver_rates dr
            INNER JOIN job_types jt ON jt.id = dr.job_type_id
            WHERE dr.driver_id = ?1
            ORDER BY jt.title, dr.id
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }

    /// Insert or replace the driver's rate for one job type.
    pub async fn upsert_rate(&self, driver_id: i64, input: &DriverRateInput) -> Result<DriverRate> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO driver_rates (driver_id, job_type_id, rate, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT (driver_id, job_type_id)
            DO UPDATE SET rate = excluded.rate, updated_at = excluded.updated_at
            "#,
        )
        .bind(driver_id)
        .bind(input.job_type_id)
        .bind(input.rate)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let rate = sqlx::query_as::<_, DriverRate>(
            r#"
            SELECT dr.id, dr.driver_id, dr.job_type_id, jt.title AS job_type_title, dr.rate,
                dr.created_at, dr.updated_at
            FROM driver_rates dr
            INNER JOIN job_types jt ON jt.id = dr.job_type_id
            WHERE dr.driver_id = ?1 AND dr.job_type_id = ?2
            "#,
        )
        .bind(driver_id)
        .bind(input.job_type_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(rate)
    }

    pub async fn delete_rate(&self, driver_id: i64, job_type_id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM driver_rates WHERE driver_id = ?1 AND job_type_id = ?2")
                .bind(driver_id)
                .bind(job_type_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Jobs driven in the date range (inclusive) with the driver's rate for each job type.
    pub async fn get_jobs_with_rates(
        &self,
        driver_id: i64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DriverJobRow>> {
        let rows = sqlx::query_as::<_, DriverJobRow>(
            r#"
            SELECT j.id AS job_id, j.job_date, jt.title AS job_type_title, jt.dispatch_type,
                j.hours, j.loads, j.weight, dr.rate AS driver_rate
            FROM jobs j
            INNER JOIN job_types jt ON jt.id = j.job_type_id
            LEFT JOIN driver_rates dr ON dr.driver_id = j.driver_id AND dr.job_type_id = j.job_type_id
            WHERE j.driver_id = ?1
                AND (?2 IS NULL OR j.job_date >= ?2)
                AND (?3 IS NULL OR j.job_date <= ?3)
            ORDER BY j.job_date, j.id
            "#,
        )
        .bind(driver_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
