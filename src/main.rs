use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;

use haulbook::database::{init_database, repositories::UserRepository};
use haulbook::middleware::RequestId;
use haulbook::{AuthService, Config, configure_app};

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter()),
    )
    .init();

    log::info!(
        "Starting haulbook API (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;

    if let Some(password) = config.admin_password.as_deref() {
        let auth_service = AuthService::new(UserRepository::new(pool.clone()), config.clone());
        auth_service
            .bootstrap_admin(&config.admin_login_id, password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap admin user: {}", e))?;
    } else {
        log::warn!("ADMIN_PASSWORD is not set; no admin account is created");
    }

    let server_address = config.server_address();
    log::info!("Listening on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .configure(|cfg| configure_app(cfg, &pool, &config))
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["Content-Disposition", "X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
