pub mod company;
pub mod dispatcher;
pub mod driver;
pub mod invoice;
pub mod job;
pub mod job_type;
pub mod unit;
pub mod user;

// Re-export all repositories for easy importing
pub use company::CompanyRepository;
pub use dispatcher::DispatcherRepository;
pub use driver::DriverRepository;
pub use invoice::InvoiceRepository;
pub use job::JobRepository;
pub use job_type::JobTypeRepository;
pub use unit::UnitRepository;
pub use user::UserRepository;
