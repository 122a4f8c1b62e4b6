//! HTTP surface for form generation.

pub mod handlers;
pub mod models;

pub use handlers::{config, FIELD_WARNINGS_HEADER};
