use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::database::models::{
    DispatchType, Dispatcher, Invoice, InvoiceDetail, InvoiceLine, InvoiceQuery, InvoiceStatus,
    InvoiceSummary, JobInvoiceStatus, NewInvoice, NewInvoiceLine,
};

const INVOICE_COLUMNS: &str = "id, invoice_number, invoice_date, dispatcher_id, billed_to, billed_email, \
    period_start, period_end, subtotal, commission_percent, commission, tax_percent, tax, total, \
    status, notes, created_at, updated_at";

const LIST_FILTER: &str = r#"
    FROM invoices i
    INNER JOIN dispatchers dp ON dp.id = i.dispatcher_id
    WHERE (?1 IS NULL
            OR i.invoice_number LIKE ?1 ESCAPE '\'
            OR i.billed_to LIKE ?1 ESCAPE '\'
            OR dp.name LIKE ?1 ESCAPE '\')
        AND (?2 IS NULL OR i.dispatcher_id = ?2)
        AND (?3 IS NULL OR i.status = ?3)
"#;

/// A job as seen by the invoicing rules, with the names its line will snapshot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillableJob {
    pub id: i64,
    pub job_date: NaiveDate,
    pub dispatcher_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub ticket_number: Option<String>,
    pub hours: Option<f64>,
    pub loads: Option<i64>,
    pub weight: Option<f64>,
    pub rate: f64,
    pub amount: f64,
    pub job_type_title: String,
    pub dispatch_type: DispatchType,
    pub driver_name: String,
    pub unit_number: String,
}

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn list(&self, query: &InvoiceQuery) -> Result<(Vec<InvoiceSummary>, i64)> {
        let page = query.page_query();
        let pattern = page.search_pattern();

        let invoices = sqlx::query_as::<_, InvoiceSummary>(&format!(
            r#"
            SELECT i.id, i.invoice_number, i.invoice_date, i.dispatcher_id, i.billed_to,
                i.billed_email, i.period_start, i.period_end, i.subtotal, i.commission_percent,
                i.commission, i.tax_percent, i.tax, i.total, i.status, i.notes, i.created_at,
                i.updated_at, dp.name AS dispatcher_name,
                (SELECT COUNT(*) FROM invoice_lines il WHERE il.invoice_id = i.id) AS line_count
            {}
            ORDER BY i.invoice_date DESC, i.id DESC
            LIMIT ?4 OFFSET ?5
            "#,
            LIST_FILTER
        ))
        .bind(&pattern)
        .bind(query.dispatcher_id)
        .bind(query.status)
        .bind(page.page_size())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {}", LIST_FILTER))
            .bind(&pattern)
            .bind(query.dispatcher_id)
            .bind(query.status)
            .fetch_one(&self.pool)
            .await?;

        Ok((invoices, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {} FROM invoices WHERE id = ?1",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn get_lines(&self, invoice_id: i64) -> Result<Vec<InvoiceLine>> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, job_id, line_number, job_date, description, unit_number,
                driver_name, quantity, rate, amount
            FROM invoice_lines
            WHERE invoice_id = ?1
            ORDER BY line_number, id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn find_detail(&self, id: i64) -> Result<Option<InvoiceDetail>> {
        let Some(invoice) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let dispatcher_name: String =
            sqlx::query_scalar("SELECT name FROM dispatchers WHERE id = ?1")
                .bind(invoice.dispatcher_id)
                .fetch_one(&self.pool)
                .await?;

        let lines = self.get_lines(id).await?;

        Ok(Some(InvoiceDetail {
            invoice,
            dispatcher_name,
            lines,
        }))
    }
}

// Transactional writes, driven by the invoicing service

pub async fn find_dispatcher(
    tx: &mut Transaction<'_, Sqlite>,
    dispatcher_id: i64,
) -> Result<Option<Dispatcher>, sqlx::Error> {
    sqlx::query_as::<_, Dispatcher>(
        "SELECT id, name, email, phone, address, commission_percent, created_at, updated_at FROM dispatchers WHERE id = ?1",
    )
    .bind(dispatcher_id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn find_billable_job(
    tx: &mut Transaction<'_, Sqlite>,
    job_id: i64,
) -> Result<Option<BillableJob>, sqlx::Error> {
    sqlx::query_as::<_, BillableJob>(
        r#"
        SELECT j.id, j.job_date, j.dispatcher_id, j.invoice_id, j.ticket_number, j.hours, j.loads,
            j.weight, j.rate, j.amount, jt.title AS job_type_title, jt.dispatch_type,
            d.name AS driver_name, u.unit_number
        FROM jobs j
        INNER JOIN job_types jt ON jt.id = j.job_type_id
        INNER JOIN drivers d ON d.id = j.driver_id
        INNER JOIN units u ON u.id = j.unit_id
        WHERE j.id = ?1
        "#,
    )
    .bind(job_id)
    .fetch_optional(&mut **tx)
    .await
}

/// `INV-00001`, `INV-00002`, ... one past the highest `INV-` number in use, skipping
/// any number a client already took.
pub async fn next_invoice_number(tx: &mut Transaction<'_, Sqlite>) -> Result<String, sqlx::Error> {
    let mut next: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(MAX(CAST(SUBSTR(invoice_number, 5) AS INTEGER)), 0) + 1
        FROM invoices
        WHERE invoice_number GLOB 'INV-[0-9]*' AND LENGTH(invoice_number) <= 13
        "#,
    )
    .fetch_one(&mut **tx)
    .await?;

    loop {
        let number = format!("INV-{:05}", next);
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM invoices WHERE invoice_number = ?1)")
                .bind(&number)
                .fetch_one(&mut **tx)
                .await?;
        if !taken {
            return Ok(number);
        }
        next += 1;
    }
}

pub async fn insert_invoice(
    tx: &mut Transaction<'_, Sqlite>,
    invoice: &NewInvoice,
) -> Result<Invoice, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Invoice>(&format!(
        r#"
        INSERT INTO invoices (invoice_number, invoice_date, dispatcher_id, billed_to, billed_email,
            period_start, period_end, subtotal, commission_percent, commission, tax_percent, tax,
            total, status, notes, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 'unpaid', ?14, ?15, ?15)
        RETURNING {}
        "#,
        INVOICE_COLUMNS
    ))
    .bind(&invoice.invoice_number)
    .bind(invoice.invoice_date)
    .bind(invoice.dispatcher_id)
    .bind(&invoice.billed_to)
    .bind(&invoice.billed_email)
    .bind(invoice.period_start)
    .bind(invoice.period_end)
    .bind(invoice.subtotal)
    .bind(invoice.commission_percent)
    .bind(invoice.commission)
    .bind(invoice.tax_percent)
    .bind(invoice.tax)
    .bind(invoice.total)
    .bind(&invoice.notes)
    .bind(now)
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_invoice(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    invoice: &NewInvoice,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(&format!(
        r#"
        UPDATE invoices
        SET invoice_number = ?1, invoice_date = ?2, dispatcher_id = ?3, billed_to = ?4,
            billed_email = ?5, period_start = ?6, period_end = ?7, subtotal = ?8,
            commission_percent = ?9, commission = ?10, tax_percent = ?11, tax = ?12, total = ?13,
            notes = ?14, updated_at = ?15
        WHERE id = ?16
        RETURNING {}
        "#,
        INVOICE_COLUMNS
    ))
    .bind(&invoice.invoice_number)
    .bind(invoice.invoice_date)
    .bind(invoice.dispatcher_id)
    .bind(&invoice.billed_to)
    .bind(&invoice.billed_email)
    .bind(invoice.period_start)
    .bind(invoice.period_end)
    .bind(invoice.subtotal)
    .bind(invoice.commission_percent)
    .bind(invoice.commission)
    .bind(invoice.tax_percent)
    .bind(invoice.tax)
    .bind(invoice.total)
    .bind(&invoice.notes)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn insert_line(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: i64,
    line: &NewInvoiceLine,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO invoice_lines (invoice_id, job_id, line_number, job_date, description,
            unit_number, driver_name, quantity, rate, amount)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(invoice_id)
    .bind(line.job_id)
    .bind(line.line_number)
    .bind(line.job_date)
    .bind(&line.description)
    .bind(&line.unit_number)
    .bind(&line.driver_name)
    .bind(line.quantity)
    .bind(line.rate)
    .bind(line.amount)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn delete_lines(tx: &mut Transaction<'_, Sqlite>, invoice_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM invoice_lines WHERE invoice_id = ?1")
        .bind(invoice_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn attach_job(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: i64,
    job_id: i64,
    status: JobInvoiceStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE jobs SET invoice_id = ?1, invoice_status = ?2, updated_at = ?3 WHERE id = ?4")
        .bind(invoice_id)
        .bind(status)
        .bind(Utc::now())
        .bind(job_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Detach every job from the invoice and put it back to `pending`.
pub async fn release_jobs(tx: &mut Transaction<'_, Sqlite>, invoice_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE jobs SET invoice_id = NULL, invoice_status = 'pending', updated_at = ?1 WHERE invoice_id = ?2",
    )
    .bind(Utc::now())
    .bind(invoice_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

pub async fn set_status(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: i64,
    status: InvoiceStatus,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(&format!(
        "UPDATE invoices SET status = ?1, updated_at = ?2 WHERE id = ?3 RETURNING {}",
        INVOICE_COLUMNS
    ))
    .bind(status)
    .bind(Utc::now())
    .bind(invoice_id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn set_job_status(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: i64,
    status: JobInvoiceStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE jobs SET invoice_status = ?1, updated_at = ?2 WHERE invoice_id = ?3")
        .bind(status)
        .bind(Utc::now())
        .bind(invoice_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn delete_invoice(tx: &mut Transaction<'_, Sqlite>, invoice_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
        .bind(invoice_id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() > 0)
}
