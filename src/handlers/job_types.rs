use actix_web::{HttpResponse, Result, web};

use crate::database::models::{JobTypeInput, JobTypeQuery, Paginated};
use crate::database::repositories::JobTypeRepository;
use crate::error::AppError;
use crate::services::auth::Claims;
use crate::validation::Validate;

pub async fn list_job_types(
    _claims: Claims,
    repo: web::Data<JobTypeRepository>,
    query: web::Query<JobTypeQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let (job_types, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch job types", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(job_types, total, &query.page_query())))
}

pub async fn get_job_type(
    _claims: Claims,
    repo: web::Data<JobTypeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let job_type = repo
        .find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch job type", e))?
        .ok_or_else(|| AppError::not_found("Job type", id))?;

    Ok(HttpResponse::Ok().json(job_type))
}

pub async fn create_job_type(
    _claims: Claims,
    repo: web::Data<JobTypeRepository>,
    input: web::Json<JobTypeInput>,
) -> Result<HttpResponse> {
    input.validate()?;

    // An unknown companyId fails the foreign key and surfaces as a 400.
    let job_type = repo
        .create(input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to create job type", e))?;
    log::info!("Created job type {} for company {}", job_type.id, job_type.company_id);

    Ok(HttpResponse::Created().json(job_type))
}

pub async fn update_job_type(
    _claims: Claims,
    repo: web::Data<JobTypeRepository>,
    path: web::Path<i64>,
    input: web::Json<JobTypeInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    input.validate()?;

    let job_type = repo
        .update(id, input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to update job type", e))?
        .ok_or_else(|| AppError::not_found("Job type", id))?;

    Ok(HttpResponse::Ok().json(job_type))
}

pub async fn delete_job_type(
    _claims: Claims,
    repo: web::Data<JobTypeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let deleted = repo
        .delete(id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete job type", e))?;
    if !deleted {
        return Err(AppError::not_found("Job type", id).into());
    }

    Ok(HttpResponse::NoContent().finish())
}
