use actix_web::web;
use sqlx::SqlitePool;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pdf;
pub mod routes;
pub mod services;
pub mod validation;

pub use config::Config;
pub use database::repositories::{
    CompanyRepository, DispatcherRepository, DriverRepository, InvoiceRepository, JobRepository,
    JobTypeRepository, UnitRepository, UserRepository,
};
pub use services::{AuthService, InvoiceService};

pub struct AppState {
    pub auth_service: AuthService,
    pub invoice_service: InvoiceService,
}

/// Registers shared state, extractor settings and every route on an app.
pub fn configure_app(cfg: &mut web::ServiceConfig, pool: &SqlitePool, config: &Config) {
    let auth_service = AuthService::new(UserRepository::new(pool.clone()), config.clone());
    let invoice_service = InvoiceService::new(InvoiceRepository::new(pool.clone()));

    cfg.app_data(web::Data::new(config.clone()))
        .app_data(web::Data::new(AppState {
            auth_service,
            invoice_service,
        }))
        .app_data(web::Data::new(CompanyRepository::new(pool.clone())))
        .app_data(web::Data::new(DriverRepository::new(pool.clone())))
        .app_data(web::Data::new(UnitRepository::new(pool.clone())))
        .app_data(web::Data::new(DispatcherRepository::new(pool.clone())))
        .app_data(web::Data::new(JobTypeRepository::new(pool.clone())))
        .app_data(web::Data::new(JobRepository::new(pool.clone())))
        .app_data(web::Data::new(InvoiceRepository::new(pool.clone())))
        .app_data(handlers::shared::json_config())
        .app_data(handlers::shared::path_config())
        .app_data(handlers::shared::query_config())
        .configure(routes::configure);
}
