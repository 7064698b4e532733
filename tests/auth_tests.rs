use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use haulbook::database::models::UserRole;
use haulbook::services::auth::decode_token;

mod common;

#[actix_web::test]
async fn test_health_needs_no_token() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_login_returns_a_two_hour_token() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "loginId": "admin", "password": "admin-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["loginId"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let claims = decode_token(token, &ctx.config.jwt_secret).unwrap();
    assert_eq!(claims.exp - claims.iat, 2 * 3600);
    assert_eq!(claims.role, UserRole::Admin);
}

#[actix_web::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    for payload in [
        json!({ "loginId": "admin", "password": "wrong" }),
        json!({ "loginId": "nobody", "password": "admin-password" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized access");
    }
}

#[actix_web::test]
async fn test_malformed_login_body_is_a_bad_request() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"loginId\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_me_returns_the_signed_in_user() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(&app, ctx.get("/me").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["loginId"], "admin");
    assert_eq!(body["name"], "Administrator");
}

#[actix_web::test]
async fn test_entity_routes_require_a_valid_token() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/companies").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/drivers")
        .insert_header(("Authorization", format!("Bearer {}x", ctx.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", ctx.token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_responses_carry_a_correlation_id() {
    let ctx = common::TestContext::new().await;
    let app = test::init_service(ctx.app()).await;

    let req = ctx
        .get("/me")
        .insert_header(("X-Correlation-ID", "trace-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-correlation-id").unwrap(), "trace-42");
}
