use actix_web::{HttpResponse, Result, web};

use crate::database::models::{PageQuery, Paginated, UnitInput};
use crate::database::repositories::UnitRepository;
use crate::error::AppError;
use crate::services::auth::Claims;
use crate::validation::Validate;

pub async fn list_units(
    _claims: Claims,
    repo: web::Data<UnitRepository>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let (units, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch units", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(units, total, &query)))
}

pub async fn get_unit(
    _claims: Claims,
    repo: web::Data<UnitRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let unit = repo
        .find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch unit", e))?
        .ok_or_else(|| AppError::not_found("Unit", id))?;

    Ok(HttpResponse::Ok().json(unit))
}

pub async fn create_unit(
    _claims: Claims,
    repo: web::Data<UnitRepository>,
    input: web::Json<UnitInput>,
) -> Result<HttpResponse> {
    input.validate()?;

    let unit = repo
        .create(input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to create unit", e))?;
    log::info!("Created unit {}", unit.id);

    Ok(HttpResponse::Created().json(unit))
}

pub async fn update_unit(
    _claims: Claims,
    repo: web::Data<UnitRepository>,
    path: web::Path<i64>,
    input: web::Json<UnitInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    input.validate()?;

    let unit = repo
        .update(id, input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to update unit", e))?
        .ok_or_else(|| AppError::not_found("Unit", id))?;

    Ok(HttpResponse::Ok().json(unit))
}

pub async fn delete_unit(
    _claims: Claims,
    repo: web::Data<UnitRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let deleted = repo
        .delete(id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete unit", e))?;
    if !deleted {
        return Err(AppError::not_found("Unit", id).into());
    }
    log::info!("Deleted unit {}", id);

    Ok(HttpResponse::NoContent().finish())
}
