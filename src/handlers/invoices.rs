use actix_web::{HttpResponse, Result, http::header, web};

use crate::AppState;
use crate::config::Config;
use crate::database::models::{InvoiceInput, InvoiceQuery, InvoiceStatusInput, Paginated};
use crate::database::repositories::InvoiceRepository;
use crate::error::AppError;
use crate::pdf::invoice::render_invoice;
use crate::services::auth::Claims;
use crate::validation::Validate;

pub async fn list_invoices(
    _claims: Claims,
    repo: web::Data<InvoiceRepository>,
    query: web::Query<InvoiceQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let (invoices, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch invoices", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(invoices, total, &query.page_query())))
}

pub async fn get_invoice(
    _claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let invoice = state.invoice_service.detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn create_invoice(
    _claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<InvoiceInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    input.validate()?;

    let invoice = state.invoice_service.create(input).await?;
    Ok(HttpResponse::Created().json(invoice))
}

pub async fn update_invoice(
    _claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<InvoiceInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    input.validate()?;

    let invoice = state
        .invoice_service
        .update(path.into_inner(), input)
        .await?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn update_invoice_status(
    _claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<InvoiceStatusInput>,
) -> Result<HttpResponse> {
    let invoice = state
        .invoice_service
        .set_status(path.into_inner(), input.status)
        .await?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn delete_invoice(
    _claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state.invoice_service.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn download_invoice_pdf(
    _claims: Claims,
    state: web::Data<AppState>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let detail = state.invoice_service.detail(path.into_inner()).await?;
    let bytes = render_invoice(&config.issuer, &detail);
    log::debug!(
        "Rendered invoice {} ({} lines, {} bytes)",
        detail.invoice.invoice_number,
        detail.lines.len(),
        bytes.len()
    );

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}.pdf\"",
                detail.invoice.invoice_number.replace('"', "")
            ),
        ))
        .body(bytes))
}
