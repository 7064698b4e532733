use actix_web::{HttpResponse, Result, web};

use crate::database::models::{PageQuery, Paginated, DispatcherInput};
use crate::database::repositories::DispatcherRepository;
use crate::error::AppError;
use crate::services::auth::Claims;
use crate::validation::Validate;

pub async fn list_dispatchers(
    _claims: Claims,
    repo: web::Data<DispatcherRepository>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let (dispatchers, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch dispatchers", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(dispatchers, total, &query)))
}

pub async fn get_dispatcher(
    _claims: Claims,
    repo: web::Data<DispatcherRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let dispatcher = repo
        .find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch dispatcher", e))?
        .ok_or_else(|| AppError::not_found("Dispatcher", id))?;

    Ok(HttpResponse::Ok().json(dispatcher))
}

pub async fn create_dispatcher(
    _claims: Claims,
    repo: web::Data<DispatcherRepository>,
    input: web::Json<DispatcherInput>,
) -> Result<HttpResponse> {
    input.validate()?;

    let dispatcher = repo
        .create(input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to create dispatcher", e))?;
    log::info!("Created dispatcher {}", dispatcher.id);

    Ok(HttpResponse::Created().json(dispatcher))
}

pub async fn update_dispatcher(
    _claims: Claims,
    repo: web::Data<DispatcherRepository>,
    path: web::Path<i64>,
    input: web::Json<DispatcherInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    input.validate()?;

    let dispatcher = repo
        .update(id, input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to update dispatcher", e))?
        .ok_or_else(|| AppError::not_found("Dispatcher", id))?;

    Ok(HttpResponse::Ok().json(dispatcher))
}

pub async fn delete_dispatcher(
    _claims: Claims,
    repo: web::Data<DispatcherRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let deleted = repo
        .delete(id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete dispatcher", e))?;
    if !deleted {
        return Err(AppError::not_found("Dispatcher", id).into());
    }
    log::info!("Deleted dispatcher {}", id);

    Ok(HttpResponse::NoContent().finish())
}
