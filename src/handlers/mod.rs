pub mod auth;
pub mod companies;
pub mod dispatchers;
pub mod drivers;
pub mod invoices;
pub mod job_types;
pub mod jobs;
pub mod shared;
pub mod units;
