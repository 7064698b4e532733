#![allow(dead_code)]

use actix_web::{
    App, Error,
    body::BoxBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    test::TestRequest,
};
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;

use haulbook::database::init_database;
use haulbook::database::models::*;
use haulbook::middleware::RequestId;
use haulbook::{
    AuthService, CompanyRepository, Config, DispatcherRepository, DriverRepository,
    JobRepository, JobTypeRepository, UnitRepository, UserRepository, configure_app,
};

/// A migrated SQLite database in a temp dir plus a signed-in admin.
pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Config,
    pub token: String,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url)
            .await
            .expect("test database");

        let config = Config::test_config();
        let auth_service = AuthService::new(UserRepository::new(pool.clone()), config.clone());
        let admin = auth_service
            .bootstrap_admin(
                &config.admin_login_id,
                config.admin_password.as_deref().expect("admin password"),
            )
            .await
            .expect("admin user");
        let token = auth_service.generate_token(&admin).expect("admin token");

        TestContext {
            pool,
            config,
            token,
            _temp_dir: temp_dir,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = Error,
            InitError = (),
        > + use<>,
    > {
        let pool = self.pool.clone();
        let config = self.config.clone();
        App::new()
            .configure(move |cfg| configure_app(cfg, &pool, &config))
            .wrap(RequestId)
    }

    fn authorized(&self, req: TestRequest) -> TestRequest {
        req.insert_header(("Authorization", format!("Bearer {}", self.token)))
    }

    pub fn get(&self, uri: &str) -> TestRequest {
        self.authorized(TestRequest::get().uri(uri))
    }

    pub fn post(&self, uri: &str, body: &Value) -> TestRequest {
        self.authorized(TestRequest::post().uri(uri).set_json(body))
    }

    pub fn put(&self, uri: &str, body: &Value) -> TestRequest {
        self.authorized(TestRequest::put().uri(uri).set_json(body))
    }

    pub fn delete(&self, uri: &str) -> TestRequest {
        self.authorized(TestRequest::delete().uri(uri))
    }

    // Fixtures written straight through the repositories

    pub async fn company(&self) -> Company {
        CompanyRepository::new(self.pool.clone())
            .create(CompanyInput {
                name: CompanyName().fake(),
                contact_person: Some(Name().fake()),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .expect("company")
    }

    pub async fn driver(&self) -> Driver {
        DriverRepository::new(self.pool.clone())
            .create(DriverInput {
                name: Name().fake(),
                email: None,
                phone: None,
                address: None,
                license_number: None,
            })
            .await
            .expect("driver")
    }

    pub async fn unit(&self, unit_number: &str) -> Unit {
        UnitRepository::new(self.pool.clone())
            .create(UnitInput {
                unit_number: unit_number.to_string(),
                plate_number: None,
                vin: None,
                make: Some("Kenworth".to_string()),
                model: Some("T880".to_string()),
                year: Some(2021),
            })
            .await
            .expect("unit")
    }

    pub async fn dispatcher(&self, commission_percent: f64) -> Dispatcher {
        DispatcherRepository::new(self.pool.clone())
            .create(DispatcherInput {
                name: Name().fake(),
                email: None,
                phone: None,
                address: None,
                commission_percent,
            })
            .await
            .expect("dispatcher")
    }

    pub async fn job_type(&self, company_id: i64, dispatch_type: DispatchType, rate: f64) -> JobType {
        JobTypeRepository::new(self.pool.clone())
            .create(JobTypeInput {
                title: format!("{} haul", dispatch_type),
                company_id,
                dispatch_type,
                rate,
                start_location: Some("North pit".to_string()),
                end_location: Some("Main St. site".to_string()),
            })
            .await
            .expect("job type")
    }

    /// A priced job; `amount` is stored as given.
    pub async fn job(&self, fixture: JobFixture) -> Job {
        JobRepository::new(self.pool.clone())
            .create(NewJob {
                job_date: fixture.job_date,
                job_type_id: fixture.job_type_id,
                driver_id: fixture.driver_id,
                unit_id: fixture.unit_id,
                dispatcher_id: fixture.dispatcher_id,
                ticket_number: None,
                hours: fixture.hours,
                loads: None,
                weight: None,
                rate: fixture.rate,
                amount: fixture.amount,
                notes: None,
            })
            .await
            .expect("job")
    }
}

#[derive(Debug, Clone)]
pub struct JobFixture {
    pub job_date: NaiveDate,
    pub job_type_id: i64,
    pub driver_id: i64,
    pub unit_id: i64,
    pub dispatcher_id: Option<i64>,
    pub hours: Option<f64>,
    pub rate: f64,
    pub amount: f64,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
