use actix_web::{HttpResponse, Result, web};

use crate::database::models::{
    Driver, DriverInput, DriverRateInput, EarningsQuery, PageQuery, Paginated,
};
use crate::database::repositories::DriverRepository;
use crate::error::AppError;
use crate::services::auth::Claims;
use crate::services::billing;
use crate::validation::Validate;

pub async fn list_drivers(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let (drivers, total) = repo
        .list(&query)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch drivers", e))?;

    Ok(HttpResponse::Ok().json(Paginated::new(drivers, total, &query)))
}

pub async fn get_driver(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let driver = repo
        .find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch driver", e))?
        .ok_or_else(|| AppError::not_found("Driver", id))?;

    Ok(HttpResponse::Ok().json(driver))
}

pub async fn create_driver(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    input: web::Json<DriverInput>,
) -> Result<HttpResponse> {
    input.validate()?;

    let driver = repo
        .create(input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to create driver", e))?;
    log::info!("Created driver {}", driver.id);

    Ok(HttpResponse::Created().json(driver))
}

pub async fn update_driver(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<i64>,
    input: web::Json<DriverInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    input.validate()?;

    let driver = repo
        .update(id, input.into_inner())
        .await
        .map_err(|e| AppError::write_failed("Failed to update driver", e))?
        .ok_or_else(|| AppError::not_found("Driver", id))?;

    Ok(HttpResponse::Ok().json(driver))
}

pub async fn delete_driver(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let deleted = repo
        .delete(id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete driver", e))?;
    if !deleted {
        return Err(AppError::not_found("Driver", id).into());
    }
    log::info!("Deleted driver {}", id);

    Ok(HttpResponse::NoContent().finish())
}

async fn require_driver(repo: &DriverRepository, id: i64) -> Result<Driver, AppError> {
    repo.find_by_id(id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch driver", e))?
        .ok_or_else(|| AppError::not_found("Driver", id))
}

pub async fn get_driver_rates(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let driver_id = path.into_inner();
    require_driver(&repo, driver_id).await?;

    let rates = repo
        .get_rates(driver_id)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch driver rates", e))?;

    Ok(HttpResponse::Ok().json(rates))
}

/// Sets the driver's pay rate for one job type, replacing any previous rate.
pub async fn upsert_driver_rate(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<i64>,
    input: web::Json<DriverRateInput>,
) -> Result<HttpResponse> {
    let driver_id = path.into_inner();
    input.validate()?;
    require_driver(&repo, driver_id).await?;

    let rate = repo
        .upsert_rate(driver_id, &input)
        .await
        .map_err(|e| AppError::write_failed("Failed to save driver rate", e))?;

    Ok(HttpResponse::Ok().json(rate))
}

pub async fn delete_driver_rate(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (driver_id, job_type_id) = path.into_inner();

    let deleted = repo
        .delete_rate(driver_id, job_type_id)
        .await
        .map_err(|e| AppError::write_failed("Failed to delete driver rate", e))?;
    if !deleted {
        return Err(AppError::NotFound(format!(
            "Driver {} has no rate for job type {}",
            driver_id, job_type_id
        ))
        .into());
    }

    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_driver_earnings(
    _claims: Claims,
    repo: web::Data<DriverRepository>,
    path: web::Path<i64>,
    query: web::Query<EarningsQuery>,
) -> Result<HttpResponse> {
    let driver_id = path.into_inner();
    let query = query.into_inner();
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::BadRequest("startDate must not be after endDate".to_string()).into());
        }
    }

    let driver = require_driver(&repo, driver_id).await?;
    let rows = repo
        .get_jobs_with_rates(driver_id, query.start_date, query.end_date)
        .await
        .map_err(|e| AppError::read_failed("Failed to fetch driver jobs", e))?;

    Ok(HttpResponse::Ok().json(billing::driver_earnings(&driver, &query, rows)))
}
