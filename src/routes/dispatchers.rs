use actix_web::web;

use crate::handlers::dispatchers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dispatchers")
            .route("", web::get().to(dispatchers::list_dispatchers))
            .route("", web::post().to(dispatchers::create_dispatcher))
            .route("/{id}", web::get().to(dispatchers::get_dispatcher))
            .route("/{id}", web::put().to(dispatchers::update_dispatcher))
            .route("/{id}", web::delete().to(dispatchers::delete_dispatcher)),
    );
}
