use actix_web::web;

pub mod auth;
pub mod companies;
pub mod dispatchers;
pub mod drivers;
pub mod invoices;
pub mod job_types;
pub mod jobs;
pub mod units;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure)
        .configure(companies::configure)
        .configure(drivers::configure)
        .configure(units::configure)
        .configure(dispatchers::configure)
        .configure(job_types::configure)
        .configure(jobs::configure)
        .configure(invoices::configure);
}
