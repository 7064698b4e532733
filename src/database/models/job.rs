use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::job_type::DispatchType;
use super::macros::string_enum;
use super::pagination::PageQuery;
use crate::error::AppError;
use crate::validation::{self, Validate};

string_enum! {
    /// Where a job stands in the billing cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum JobInvoiceStatus {
        Pending => "pending",
        Raised => "raised",
        Received => "received",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub job_date: NaiveDate,
    pub job_type_id: i64,
    pub driver_id: i64,
    pub unit_id: i64,
    pub dispatcher_id: Option<i64>,
    pub ticket_number: Option<String>,
    pub hours: Option<f64>,
    pub loads: Option<i64>,
    pub weight: Option<f64>,
    pub rate: f64,
    pub amount: f64,
    pub invoice_status: JobInvoiceStatus,
    pub invoice_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job with the names of everything it references.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub job_type_title: String,
    pub dispatch_type: DispatchType,
    pub company_id: i64,
    pub company_name: String,
    pub driver_name: String,
    pub unit_number: String,
    pub dispatcher_name: Option<String>,
    pub invoice_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    pub job_date: NaiveDate,
    pub job_type_id: i64,
    pub driver_id: i64,
    pub unit_id: i64,
    pub dispatcher_id: Option<i64>,
    pub ticket_number: Option<String>,
    pub hours: Option<f64>,
    pub loads: Option<i64>,
    pub weight: Option<f64>,
    /// Defaults to the job type's rate.
    pub rate: Option<f64>,
    /// Defaults to rate × quantity.
    pub amount: Option<f64>,
    pub notes: Option<String>,
}

impl Validate for JobInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::bounded("hours", self.hours, validation::MAX_QUANTITY)?;
        validation::bounded("loads", self.loads.map(|l| l as f64), validation::MAX_QUANTITY)?;
        validation::bounded("weight", self.weight, validation::MAX_QUANTITY)?;
        validation::bounded("rate", self.rate, validation::MAX_RATE)?;
        validation::bounded("amount", self.amount, validation::MAX_AMOUNT)
    }
}

/// Job columns after billing rules have resolved rate and amount.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_date: NaiveDate,
    pub job_type_id: i64,
    pub driver_id: i64,
    pub unit_id: i64,
    pub dispatcher_id: Option<i64>,
    pub ticket_number: Option<String>,
    pub hours: Option<f64>,
    pub loads: Option<i64>,
    pub weight: Option<f64>,
    pub rate: f64,
    pub amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub driver_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub dispatcher_id: Option<i64>,
    pub job_type_id: Option<i64>,
    pub invoice_status: Option<JobInvoiceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl JobQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
        }
    }
}
