use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::{self, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dispatcher {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub commission_percent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub commission_percent: f64,
}

impl Validate for DispatcherInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("name", &self.name)?;
        validation::email("email", self.email.as_deref())?;
        validation::phone("phone", self.phone.as_deref())?;
        validation::percent("commissionPercent", self.commission_percent)
    }
}
