use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde_json::json;

use crate::AppState;
use crate::database::models::{LoginInput, UserInfo};
use crate::handlers::shared::correlation_id;
use crate::services::auth::Claims;

pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    })))
}

pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    let login_id = input.login_id.clone();

    let response = state.auth_service.login(input).await.inspect_err(|_| {
        log::info!(
            "Login rejected for {} (correlation_id={})",
            login_id,
            correlation_id(&req)
        );
    })?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn me(claims: Claims, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = state.auth_service.current_user(&claims).await?;
    Ok(HttpResponse::Ok().json(UserInfo::from(user)))
}
