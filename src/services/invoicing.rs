use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};

use crate::database::models::{
    Invoice, InvoiceDetail, InvoiceInput, InvoiceStatus, JobInvoiceStatus, NewInvoice,
    NewInvoiceLine,
};
use crate::database::repositories::InvoiceRepository;
use crate::database::repositories::invoice::{self as invoice_repo, BillableJob};
use crate::database::transaction::DatabaseTransaction;
use crate::error::AppError;
use crate::services::billing::{self, InvoiceTotals};
use crate::validation::normalize;

/// Values an invoice keeps when an update leaves them out.
#[derive(Debug, Clone)]
struct InvoiceDefaults {
    invoice_number: Option<String>,
    invoice_date: NaiveDate,
}

#[derive(Debug)]
struct PreparedInvoice {
    invoice: NewInvoice,
    lines: Vec<NewInvoiceLine>,
}

/// Creates, rewrites and settles invoices together with the jobs they bill.
#[derive(Clone)]
pub struct InvoiceService {
    repository: InvoiceRepository,
}

impl InvoiceService {
    pub fn new(repository: InvoiceRepository) -> Self {
        Self { repository }
    }

    pub async fn detail(&self, id: i64) -> Result<InvoiceDetail, AppError> {
        self.repository
            .find_detail(id)
            .await
            .map_err(|e| AppError::read_failed("Failed to fetch invoice", e))?
            .ok_or_else(|| AppError::not_found("Invoice", id))
    }

    pub async fn create(&self, input: InvoiceInput) -> Result<InvoiceDetail, AppError> {
        let defaults = InvoiceDefaults {
            invoice_number: None,
            invoice_date: Utc::now().date_naive(),
        };

        let invoice = DatabaseTransaction::run(self.repository.pool(), |tx| {
            Box::pin(async move {
                let prepared = prepare(tx, &input, defaults).await?;

                let invoice = invoice_repo::insert_invoice(tx, &prepared.invoice)
                    .await
                    .map_err(|e| AppError::write_failed("Failed to create invoice", e))?;

                write_lines(tx, invoice.id, &prepared.lines, JobInvoiceStatus::Raised).await?;

                Ok(invoice)
            })
        })
        .await?;

        log::info!(
            "Created invoice {} ({}) for dispatcher {}",
            invoice.invoice_number,
            invoice.id,
            invoice.dispatcher_id
        );

        self.detail(invoice.id).await
    }

    /// Replaces the invoice's lines and job set; totals are recomputed.
    pub async fn update(&self, id: i64, input: InvoiceInput) -> Result<InvoiceDetail, AppError> {
        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(|e| AppError::read_failed("Failed to fetch invoice", e))?
            .ok_or_else(|| AppError::not_found("Invoice", id))?;

        let defaults = InvoiceDefaults {
            invoice_number: Some(existing.invoice_number),
            invoice_date: existing.invoice_date,
        };
        let job_status = job_status_for(existing.status);

        DatabaseTransaction::run(self.repository.pool(), |tx| {
            Box::pin(async move {
                invoice_repo::release_jobs(tx, id).await?;
                invoice_repo::delete_lines(tx, id).await?;

                let prepared = prepare(tx, &input, defaults).await?;

                invoice_repo::update_invoice(tx, id, &prepared.invoice)
                    .await
                    .map_err(|e| AppError::write_failed("Failed to update invoice", e))?
                    .ok_or_else(|| AppError::not_found("Invoice", id))?;

                write_lines(tx, id, &prepared.lines, job_status).await?;

                Ok(())
            })
        })
        .await?;

        log::info!("Updated invoice {}", id);

        self.detail(id).await
    }

    /// Paid invoices move their jobs to `received`; unpaid ones back to `raised`.
    pub async fn set_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice, AppError> {
        let invoice = DatabaseTransaction::run(self.repository.pool(), |tx| {
            Box::pin(async move {
                let invoice = invoice_repo::set_status(tx, id, status)
                    .await
                    .map_err(|e| AppError::write_failed("Failed to update invoice status", e))?
                    .ok_or_else(|| AppError::not_found("Invoice", id))?;

                invoice_repo::set_job_status(tx, id, job_status_for(status)).await?;

                Ok(invoice)
            })
        })
        .await?;

        log::info!("Invoice {} marked {}", invoice.invoice_number, invoice.status);

        Ok(invoice)
    }

    /// Deletes the invoice and returns its jobs to `pending`.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        DatabaseTransaction::run(self.repository.pool(), |tx| {
            Box::pin(async move {
                let released = invoice_repo::release_jobs(tx, id).await?;

                let deleted = invoice_repo::delete_invoice(tx, id)
                    .await
                    .map_err(|e| AppError::write_failed("Failed to delete invoice", e))?;
                if !deleted {
                    return Err(AppError::not_found("Invoice", id));
                }

                log::info!("Deleted invoice {}, released {} jobs", id, released);
                Ok(())
            })
        })
        .await
    }
}

fn job_status_for(status: InvoiceStatus) -> JobInvoiceStatus {
    match status {
        InvoiceStatus::Unpaid => JobInvoiceStatus::Raised,
        InvoiceStatus::Paid => JobInvoiceStatus::Received,
    }
}

fn line_description(job: &BillableJob) -> String {
    match job.ticket_number.as_deref() {
        Some(ticket) => format!("{} (ticket {})", job.job_type_title, ticket),
        None => job.job_type_title.clone(),
    }
}

/// Loads and checks the jobs, then resolves numbering, period and totals.
async fn prepare(
    tx: &mut Transaction<'_, Sqlite>,
    input: &InvoiceInput,
    defaults: InvoiceDefaults,
) -> Result<PreparedInvoice, AppError> {
    let dispatcher = invoice_repo::find_dispatcher(tx, input.dispatcher_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("Dispatcher {} does not exist", input.dispatcher_id))
        })?;

    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(input.job_ids.len());
    for &job_id in input.job_ids.iter().filter(|id| seen.insert(**id)) {
        let job = invoice_repo::find_billable_job(tx, job_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Job {} does not exist", job_id)))?;

        if job.invoice_id.is_some() {
            return Err(AppError::BadRequest(format!(
                "Job {} is already on another invoice",
                job_id
            )));
        }
        if job.dispatcher_id != Some(dispatcher.id) {
            return Err(AppError::BadRequest(format!(
                "Job {} was not dispatched by {}",
                job_id, dispatcher.name
            )));
        }

        jobs.push(job);
    }
    jobs.sort_by_key(|job| (job.job_date, job.id));

    let (Some(first), Some(last)) = (jobs.first(), jobs.last()) else {
        return Err(AppError::BadRequest(
            "An invoice needs at least one job".to_string(),
        ));
    };
    let period_start = input.period_start.unwrap_or(first.job_date);
    let period_end = input.period_end.unwrap_or(last.job_date);
    if period_start > period_end {
        return Err(AppError::BadRequest(
            "periodStart must not be after periodEnd".to_string(),
        ));
    }

    let lines: Vec<NewInvoiceLine> = jobs
        .iter()
        .enumerate()
        .map(|(index, job)| NewInvoiceLine {
            job_id: job.id,
            line_number: index as i64 + 1,
            job_date: job.job_date,
            description: line_description(job),
            unit_number: job.unit_number.clone(),
            driver_name: job.driver_name.clone(),
            quantity: billing::job_quantity(job.dispatch_type, job.hours, job.loads, job.weight)
                .unwrap_or(1.0),
            rate: job.rate,
            amount: job.amount,
        })
        .collect();

    let totals = InvoiceTotals::compute(
        lines.iter().map(|line| line.amount),
        input
            .commission_percent
            .unwrap_or(dispatcher.commission_percent),
        input.tax_percent,
    );

    let invoice_number = match normalize(input.invoice_number.clone()).or(defaults.invoice_number) {
        Some(number) => number,
        None => invoice_repo::next_invoice_number(tx).await?,
    };

    Ok(PreparedInvoice {
        invoice: NewInvoice {
            invoice_number,
            invoice_date: input.invoice_date.unwrap_or(defaults.invoice_date),
            dispatcher_id: dispatcher.id,
            billed_to: input.billed_to.trim().to_string(),
            billed_email: normalize(input.billed_email.clone()),
            period_start,
            period_end,
            subtotal: totals.subtotal,
            commission_percent: totals.commission_percent,
            commission: totals.commission,
            tax_percent: totals.tax_percent,
            tax: totals.tax,
            total: totals.total,
            notes: normalize(input.notes.clone()),
        },
        lines,
    })
}

async fn write_lines(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: i64,
    lines: &[NewInvoiceLine],
    job_status: JobInvoiceStatus,
) -> Result<(), AppError> {
    for line in lines {
        invoice_repo::insert_line(tx, invoice_id, line).await?;
        invoice_repo::attach_job(tx, invoice_id, line.job_id, job_status).await?;
    }

    Ok(())
}
