//! Input validation and URL helpers shared by the services.

pub mod domain;
pub mod urls;
