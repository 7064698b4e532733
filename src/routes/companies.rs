use actix_web::web;

use crate::handlers::companies;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/companies")
            .route("", web::get().to(companies::list_companies))
            .route("", web::post().to(companies::create_company))
            .route("/{id}", web::get().to(companies::get_company))
            .route("/{id}", web::put().to(companies::update_company))
            .route("/{id}", web::delete().to(companies::delete_company)),
    );
}
