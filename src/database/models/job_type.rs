use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::pagination::PageQuery;
use crate::error::AppError;
use crate::validation::{self, Validate};

string_enum! {
    /// How a job of this type is billed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum DispatchType {
        Hourly => "hourly",
        Load => "load",
        Tonnage => "tonnage",
        Fixed => "fixed",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobType {
    pub id: i64,
    pub title: String,
    pub company_id: i64,
    pub dispatch_type: DispatchType,
    pub rate: f64,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobTypeDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job_type: JobType,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTypeInput {
    pub title: String,
    pub company_id: i64,
    pub dispatch_type: DispatchType,
    pub rate: f64,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
}

impl Validate for JobTypeInput {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("title", &self.title)?;
        validation::bounded("rate", Some(self.rate), validation::MAX_RATE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTypeQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub company_id: Option<i64>,
}

impl JobTypeQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
        }
    }
}
