use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::{self, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
}

impl Validate for DriverInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("name", &self.name)?;
        validation::email("email", self.email.as_deref())?;
        validation::phone("phone", self.phone.as_deref())
    }
}

/// Pay rate a driver earns on one job type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DriverRate {
    pub id: i64,
    pub driver_id: i64,
    pub job_type_id: i64,
    pub job_type_title: String,
    pub rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRateInput {
    pub job_type_id: i64,
    pub rate: f64,
}

impl Validate for DriverRateInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::bounded("rate", Some(self.rate), validation::MAX_RATE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsLine {
    pub job_id: i64,
    pub job_date: NaiveDate,
    pub job_type_title: String,
    pub quantity: f64,
    pub rate: Option<f64>,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverEarnings {
    pub driver_id: i64,
    pub driver_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub jobs: Vec<EarningsLine>,
    pub total: f64,
    /// Jobs whose job type has no rate configured for this driver.
    pub unrated_jobs: i64,
}
