use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::{self, Validate};

/// A truck in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub unit_number: String,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInput {
    pub unit_number: String,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
}

impl Validate for UnitInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("unitNumber", &self.unit_number)?;
        validation::in_range("year", self.year, 1900, 2100)
    }
}
