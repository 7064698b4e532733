use actix_web::web;

use crate::handlers::jobs;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(jobs::list_jobs))
            .route("", web::post().to(jobs::create_job))
            .route("/{id}", web::get().to(jobs::get_job))
            .route("/{id}", web::put().to(jobs::update_job))
            .route("/{id}", web::delete().to(jobs::delete_job)),
    );
}
