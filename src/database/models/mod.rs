pub mod company;
pub mod dispatcher;
pub mod driver;
pub mod invoice;
pub mod job;
pub mod job_type;
pub(crate) mod macros;
pub mod pagination;
pub mod unit;
pub mod user;

// Re-export all models for easy importing
pub use company::*;
pub use dispatcher::*;
pub use driver::*;
pub use invoice::*;
pub use job::*;
pub use job_type::*;
pub use pagination::*;
pub use unit::*;
pub use user::*;
