use actix_web::{HttpResponse, Result, web};

use crate::database::models::{Job, JobInput, JobQuery, JobType, Paginated};
use crate::database::repositories::{JobRepository, JobTypeRepository};
use crate::error::AppError;
use crate::services::auth::Claims;
use crate::services::billing;
use crate::validation::Validate;

pub async fn list_jobs(
    _claims: Claims,
    repo: web::Data<JobRepository>,
    query: web::Query<JobQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(
                AppError::BadRequest("startDate must not be after endDate".to_string()).into(),
            );
        }
    }

    let (jobs, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch jobs", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(jobs, total, &query.page_query())))
}

pub async fn get_job(
    _claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(job_detail(&repo, path.into_inner()).await?)
}

async fn job_type_for(repo: &JobTypeRepository, input: &JobInput) -> Result<JobType, AppError> {
    repo.find_by_id(input.job_type_id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch job type", e))?
        .map(|detail| detail.job_type)
        .ok_or_else(|| {
            AppError::BadRequest(format!("Job type {} does not exist", input.job_type_id))
        })
}

/// Invoiced jobs are frozen until their invoice is deleted.
async fn editable_job(repo: &JobRepository, id: i64) -> Result<Job, AppError> {
    let job = repo
        .find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch job", e))?
        .ok_or_else(|| AppError::not_found("Job", id))?;

    if job.invoice_id.is_some() {
        return Err(AppError::BadRequest(format!(
            "Job {} is on an invoice and cannot be changed",
            id
        )));
    }

    Ok(job)
}

async fn job_detail(repo: &JobRepository, id: i64) -> Result<HttpResponse, AppError> {
    let job = repo
        .find_detail(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch job", e))?
        .ok_or_else(|| AppError::not_found("Job", id))?;

    Ok(HttpResponse::Ok().json(job))
}

pub async fn create_job(
    _claims: Claims,
    repo: web::Data<JobRepository>,
    job_types: web::Data<JobTypeRepository>,
    input: web::Json<JobInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    input.validate()?;

    let job_type = job_type_for(&job_types, &input).await?;
    let new_job = billing::price_job(&job_type, input)?;

    let job = repo
        .create(new_job)
        .await
        .map_err(|e| AppError::write_failed("Failed to create job", e))?;
    log::info!("Created job {} ({} {})", job.id, job_type.title, job.amount);

    let detail = repo
        .find_detail(job.id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch job", e))?
        .ok_or_else(|| AppError::not_found("Job", job.id))?;

    Ok(HttpResponse::Created().json(detail))
}

pub async fn update_job(
    _claims: Claims,
    repo: web::Data<JobRepository>,
    job_types: web::Data<JobTypeRepository>,
    path: web::Path<i64>,
    input: web::Json<JobInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let input = input.into_inner();
    input.validate()?;

    editable_job(&repo, id).await?;
    let job_type = job_type_for(&job_types, &input).await?;
    let new_job = billing::price_job(&job_type, input)?;

    repo.update(id, new_job)
        .await
        .map_err(|e| AppError::write_failed("Failed to update job", e))?
        .ok_or_else(|| {
            AppError::BadRequest(format!("Job {} is on an invoice and cannot be changed", id))
        })?;

    Ok(job_detail(&repo, id).await?)
}

pub async fn delete_job(
    _claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    editable_job(&repo, id).await?;

    let deleted = repo
        .delete(id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete job", e))?;
    if !deleted {
        return Err(AppError::BadRequest(format!(
            "Job {} is on an invoice and cannot be changed",
            id
        ))
        .into());
    }
    log::info!("Deleted job {}", id);

    Ok(HttpResponse::NoContent().finish())
}
