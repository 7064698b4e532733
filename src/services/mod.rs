pub mod auth;
pub mod billing;
pub mod invoicing;

pub use auth::{AuthService, Claims};
pub use invoicing::InvoiceService;
