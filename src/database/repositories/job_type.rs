use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{JobType, JobTypeDetail, JobTypeInput, JobTypeQuery};
use crate::validation::normalize;

const SELECT_DETAIL: &str = r#"
    SELECT jt.id, jt.title, jt.company_id, jt.dispatch_type, jt.rate, jt.start_location,
        jt.end_location, jt.created_at, jt.updated_at, c.name AS company_name
    FROM job_types jt
    INNER JOIN companies c ON c.id = jt.company_id
"#;

#[derive(Clone)]
pub struct JobTypeRepository {
    pool: SqlitePool,
}

impl JobTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &JobTypeQuery) -> Result<(Vec<JobTypeDetail>, i64)> {
        let page = query.page_query();
        let pattern = page.search_pattern();

        let job_types = sqlx::query_as::<_, JobTypeDetail>(&format!(
            r#"{}
            WHERE (?1 IS NULL
                    OR jt.title LIKE ?1 ESCAPE '\'
                    OR jt.start_location LIKE ?1 ESCAPE '\'
                    OR jt.end_location LIKE ?1 ESCAPE '\'
                    OR c.name LIKE ?1 ESCAPE '\')
                AND (?2 IS NULL OR jt.company_id = ?2)
            ORDER BY jt.title, jt.id
            LIMIT ?3 OFFSET ?4
            "#,
            SELECT_DETAIL
        ))
        .bind(&pattern)
        .bind(query.company_id)
        .bind(page.page_size())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM job_types jt
            INNER JOIN companies c ON c.id = jt.company_id
            WHERE (?1 IS NULL
                    OR jt.title LIKE ?1 ESCAPE '\'
                    OR jt.start_location LIKE ?1 ESCAPE '\'
                    OR jt.end_location LIKE ?1 ESCAPE '\'
                    OR c.name LIKE ?1 ESCAPE '\')
                AND (?2 IS NULL OR jt.company_id = ?2)
            "#,
        )
        .bind(&pattern)
        .bind(query.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((job_types, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<JobTypeDetail>> {
        let job_type =
            sqlx::query_as::<_, JobTypeDetail>(&format!("{} WHERE jt.id = ?1", SELECT_DETAIL))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(job_type)
    }

    pub async fn create(&self, input: JobTypeInput) -> Result<JobType> {
        let now = Utc::now();
        let job_type = sqlx::query_as::<_, JobType>(
            r#"
            INSERT INTO job_types (title, company_id, dispatch_type, rate, start_location, end_location,
                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING id, title, company_id, dispatch_type, rate, start_location, end_location,
                created_at, updated_at
            "#,
        )
        .bind(input.title.trim())
        .bind(input.company_id)
        .bind(input.dispatch_type)
        .bind(input.rate)
        .bind(normalize(input.start_location))
        .bind(normalize(input.end_location))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(job_type)
    }

    pub async fn update(&self, id: i64, input: JobTypeInput) -> Result<Option<JobType>> {
        let job_type = sqlx::query_as::<_, JobType>(
            r#"
            UPDATE job_types
            SET title = ?1, company_id = ?2, dispatch_type = ?3, rate = ?4, start_location = ?5,
                end_location = ?6, updated_at = ?7
            WHERE id = ?8
            RETURNING id, title, company_id, dispatch_type, rate, start_location, end_location,
                created_at, updated_at
            "#,
        )
        .bind(input.title.trim())
        .bind(input.company_id)
        .bind(input.dispatch_type)
        .bind(input.rate)
        .bind(normalize(input.start_location))
        .bind(normalize(input.end_location))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job_type)
    }

    /// Fails with a foreign-key error while jobs still reference the job type.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_types WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
