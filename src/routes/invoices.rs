use actix_web::web;

use crate::handlers::invoices;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(invoices::list_invoices))
            .route("", web::post().to(invoices::create_invoice))
            .route("/{id}", web::get().to(invoices::get_invoice))
            .route("/{id}", web::put().to(invoices::update_invoice))
            .route("/{id}", web::delete().to(invoices::delete_invoice))
            .route(
                "/{id}/status",
                web::put().to(invoices::update_invoice_status),
            )
            .route("/{id}/pdf", web::get().to(invoices::download_invoice_pdf)),
    );
}
