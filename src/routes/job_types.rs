use actix_web::web;

use crate::handlers::job_types;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobtypes")
            .route("", web::get().to(job_types::list_job_types))
            .route("", web::post().to(job_types::create_job_type))
            .route("/{id}", web::get().to(job_types::get_job_type))
            .route("/{id}", web::put().to(job_types::update_job_type))
            .route("/{id}", web::delete().to(job_types::delete_job_type)),
    );
}
