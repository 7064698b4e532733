use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::pagination::PageQuery;
use crate::error::AppError;
use crate::validation::{self, Validate};

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum InvoiceStatus {
        Unpaid => "unpaid",
        Paid => "paid",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub dispatcher_id: i64,
    pub billed_to: String,
    pub billed_email: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub subtotal: f64,
    pub commission_percent: f64,
    pub commission: f64,
    pub tax_percent: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row: the invoice plus who it is billed through and how many lines it has.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub dispatcher_name: String,
    pub line_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub id: i64,
    pub invoice_id: i64,
    pub job_id: Option<i64>,
    pub line_number: i64,
    pub job_date: NaiveDate,
    pub description: String,
    pub unit_number: String,
    pub driver_name: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub dispatcher_name: String,
    pub lines: Vec<InvoiceLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    /// Generated as `INV-NNNNN` when absent.
    pub invoice_number: Option<String>,
    /// Defaults to today.
    pub invoice_date: Option<NaiveDate>,
    pub dispatcher_id: i64,
    pub billed_to: String,
    pub billed_email: Option<String>,
    /// Defaults to the earliest job date.
    pub period_start: Option<NaiveDate>,
    /// Defaults to the latest job date.
    pub period_end: Option<NaiveDate>,
    /// Defaults to the dispatcher's commission.
    pub commission_percent: Option<f64>,
    #[serde(default)]
    pub tax_percent: f64,
    pub notes: Option<String>,
    pub job_ids: Vec<i64>,
}

impl Validate for InvoiceInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("billedTo", &self.billed_to)?;
        validation::email("billedEmail", self.billed_email.as_deref())?;
        if let Some(commission) = self.commission_percent {
            validation::percent("commissionPercent", commission)?;
        }
        validation::percent("taxPercent", self.tax_percent)?;
        if self.job_ids.is_empty() {
            return Err(AppError::BadRequest(
                "An invoice needs at least one job".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.period_start, self.period_end) {
            if start > end {
                return Err(AppError::BadRequest(
                    "periodStart must not be after periodEnd".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStatusInput {
    pub status: InvoiceStatus,
}

/// Invoice columns after numbering, period and totals are resolved.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub dispatcher_id: i64,
    pub billed_to: String,
    pub billed_email: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub subtotal: f64,
    pub commission_percent: f64,
    pub commission: f64,
    pub tax_percent: f64,
    pub tax: f64,
    pub total: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewInvoiceLine {
    pub job_id: i64,
    pub line_number: i64,
    pub job_date: NaiveDate,
    pub description: String,
    pub unit_number: String,
    pub driver_name: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub dispatcher_id: Option<i64>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
        }
    }
}
