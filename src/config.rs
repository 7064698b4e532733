use anyhow::Result;
use std::env;

/// Letterhead printed at the top of every invoice PDF.
#[derive(Debug, Clone, Default)]
pub struct InvoiceIssuer {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_origin: String,
    pub admin_login_id: String,
    pub admin_password: Option<String>,
    pub bcrypt_cost: u32,
    pub issuer: InvoiceIssuer,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./haulbook.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_login_id: env::var("ADMIN_LOGIN_ID").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            issuer: InvoiceIssuer {
                name: env::var("ISSUER_NAME").unwrap_or_else(|_| "Haulbook Trucking".to_string()),
                address: env::var("ISSUER_ADDRESS").ok(),
                phone: env::var("ISSUER_PHONE").ok(),
                email: env::var("ISSUER_EMAIL").ok(),
                tax_number: env::var("ISSUER_TAX_NUMBER").ok(),
            },
        })
    }

    /// Fixed configuration for tests; never reads the environment.
    pub fn test_config() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_hours: 2,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_origin: "http://localhost:3000".to_string(),
            admin_login_id: "admin".to_string(),
            admin_password: Some("admin-password".to_string()),
            bcrypt_cost: 4,
            issuer: InvoiceIssuer {
                name: "Test Haulage Ltd.".to_string(),
                address: Some("1 Depot Road, Springfield".to_string()),
                phone: Some("555-0100".to_string()),
                email: Some("billing@test-haulage.example".to_string()),
                tax_number: Some("HST 123456789".to_string()),
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// `RUST_LOG` wins; otherwise production logs at info and everything else at debug.
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_production() { "info" } else { "debug" }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
