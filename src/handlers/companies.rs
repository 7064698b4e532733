use actix_web::{HttpResponse, Result, web};

use crate::database::models::{PageQuery, Paginated, CompanyInput};
use crate::database::repositories::CompanyRepository;
use crate::error::AppError;
use crate::services::auth::Claims;
use crate::validation::Validate;

pub async fn list_companies(
    _claims: Claims,
    repo: web::Data<CompanyRepository>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let (companies, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch companies", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(companies, total, &query)))
}

pub async fn get_company(
    _claims: Claims,
    repo: web::Data<CompanyRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let company = repo
        .find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch company", e))?
        .ok_or_else(|| AppError::not_found("Company", id))?;

    Ok(HttpResponse::Ok().json(company))
}

pub async fn create_company(
    _claims: Claims,
    repo: web::Data<CompanyRepository>,
    input: web::Json<CompanyInput>,
) -> Result<HttpResponse> {
    input.validate()?;

    let company = repo
        .create(input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to create company", e))?;
    log::info!("Created company {}", company.id);

    Ok(HttpResponse::Created().json(company))
}

pub async fn update_company(
    _claims: Claims,
    repo: web::Data<CompanyRepository>,
    path: web::Path<i64>,
    input: web::Json<CompanyInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    input.validate()?;

    let company = repo
        .update(id, input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to update company", e))?
        .ok_or_else(|| AppError::not_found("Company", id))?;

    Ok(HttpResponse::Ok().json(company))
}

pub async fn delete_company(
    _claims: Claims,
    repo: web::Data<CompanyRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let deleted = repo
        .delete(id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete company", e))?;
    if !deleted {
        return Err(AppError::not_found("Company", id).into());
    }
    log::info!("Deleted company {}", id);

    Ok(HttpResponse::NoContent().finish())
}
