use actix_web::web;

use crate::handlers::drivers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/drivers")
            .route("", web::get().to(drivers::list_drivers))
            .route("", web::post().to(drivers::create_driver))
            .route("/{id}", web::get().to(drivers::get_driver))
            .route("/{id}", web::put().to(drivers::update_driver))
            .route("/{id}", web::delete().to(drivers::delete_driver))
            .route("/{id}/rates", web::get().to(drivers::get_driver_rates))
            .route("/{id}/rates", web::put().to(drivers::upsert_driver_rate))
            .route(
                "/{id}/rates/{job_type_id}",
                web::delete().to(drivers::delete_driver_rate),
            )
            .route("/{id}/earnings", web::get().to(drivers::get_driver_earnings)),
    );
}
