//! Outbound email delivery

pub mod log_email;

pub use log_email::LogEmailService;
