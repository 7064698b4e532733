use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Job, JobDetail, JobQuery, NewJob};

const JOB_COLUMNS: &str = "id, job_date, job_type_id, driver_id, unit_id, dispatcher_id, ticket_number, \
    hours, loads, weight, rate, amount, invoice_status, invoice_id, notes, created_at, updated_at";

const DETAIL_FROM: &str = r#"
    FROM jobs j
    INNER JOIN job_types jt ON jt.id = j.job_type_id
    INNER JOIN companies c ON c.id = jt.company_id
    INNER JOIN drivers d ON d.id = j.driver_id
    INNER JOIN units u ON u.id = j.unit_id
    LEFT JOIN dispatchers dp ON dp.id = j.dispatcher_id
    LEFT JOIN invoices i ON i.id = j.invoice_id
"#;

const DETAIL_COLUMNS: &str = r#"
    SELECT j.id, j.job_date, j.job_type_id, j.driver_id, j.unit_id, j.dispatcher_id,
        j.ticket_number, j.hours, j.loads, j.weight, j.rate, j.amount, j.invoice_status,
        j.invoice_id, j.notes, j.created_at, j.updated_at,
        jt.title AS job_type_title, jt.dispatch_type, jt.company_id, c.name AS company_name,
        d.name AS driver_name, u.unit_number, dp.name AS dispatcher_name, i.invoice_number
"#;

const LIST_FILTER: &str = r#"
    WHERE (?1 IS NULL
            OR j.ticket_number LIKE ?1 ESCAPE '\'
            OR j.notes LIKE ?1 ESCAPE '\'
            OR jt.title LIKE ?1 ESCAPE '\'
            OR c.name LIKE ?1 ESCAPE '\'
            OR d.name LIKE ?1 ESCAPE '\'
            OR u.unit_number LIKE ?1 ESCAPE '\')
        AND (?2 IS NULL OR j.driver_id = ?2)
        AND (?3 IS NULL OR j.unit_id = ?3)
        AND (?4 IS NULL OR j.dispatcher_id = ?4)
        AND (?5 IS NULL OR j.job_type_id = ?5)
        AND (?6 IS NULL OR j.invoice_status = ?6)
        AND (?7 IS NULL OR j.job_date >= ?7)
        AND (?8 IS NULL OR j.job_date <= ?8)
"#;

#[derive(Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

impl JobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &JobQuery) -> Result<(Vec<JobDetail>, i64)> {
        let page = query.page_query();
        let pattern = page.search_pattern();

        let jobs = sqlx::query_as::<_, JobDetail>(&format!(
            "{} {} {} ORDER BY j.job_date DESC, j.id DESC LIMIT ?9 OFFSET ?10",
            DETAIL_COLUMNS, DETAIL_FROM, LIST_FILTER
        ))
        .bind(&pattern)
        .bind(query.driver_id)
        .bind(query.unit_id)
        .bind(query.dispatcher_id)
        .bind(query.job_type_id)
        .bind(query.invoice_status)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(page.page_size())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) {} {}",
            DETAIL_FROM, LIST_FILTER
        ))
        .bind(&pattern)
        .bind(query.driver_id)
        .bind(query.unit_id)
        .bind(query.dispatcher_id)
        .bind(query.job_type_id)
        .bind(query.invoice_status)
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok((jobs, total))
    }

    pub async fn find_detail(&self, id: i64) -> Result<Option<JobDetail>> {
        let job = sqlx::query_as::<_, JobDetail>(&format!(
            "{} {} WHERE j.id = ?1",
            DETAIL_COLUMNS, DETAIL_FROM
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = ?1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn create(&self, job: NewJob) -> Result<Job> {
        let now = Utc::now();
        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (job_date, job_type_id, driver_id, unit_id, dispatcher_id, ticket_number,
                hours, loads, weight, rate, amount, invoice_status, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 'pending', ?12, ?13, ?13)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.job_date)
        .bind(job.job_type_id)
        .bind(job.driver_id)
        .bind(job.unit_id)
        .bind(job.dispatcher_id)
        .bind(job.ticket_number)
        .bind(job.hours)
        .bind(job.loads)
        .bind(job.weight)
        .bind(job.rate)
        .bind(job.amount)
        .bind(job.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    /// Only touches jobs that are not on an invoice.
    pub async fn update(&self, id: i64, job: NewJob) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET job_date = ?1, job_type_id = ?2, driver_id = ?3, unit_id = ?4, dispatcher_id = ?5,
                ticket_number = ?6, hours = ?7, loads = ?8, weight = ?9, rate = ?10, amount = ?11,
                notes = ?12, updated_at = ?13
            WHERE id = ?14 AND invoice_id IS NULL
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.job_date)
        .bind(job.job_type_id)
        .bind(job.driver_id)
        .bind(job.unit_id)
        .bind(job.dispatcher_id)
        .bind(job.ticket_number)
        .bind(job.hours)
        .bind(job.loads)
        .bind(job.weight)
        .bind(job.rate)
        .bind(job.amount)
        .bind(job.notes)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    /// Only deletes jobs that are not on an invoice.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?1 AND invoice_id IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
