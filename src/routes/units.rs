use actix_web::web;

use crate::handlers::units;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/units")
            .route("", web::get().to(units::list_units))
            .route("", web::post().to(units::create_unit))
            .route("/{id}", web::get().to(units::get_unit))
            .route("/{id}", web::put().to(units::update_unit))
            .route("/{id}", web::delete().to(units::delete_unit)),
    );
}
