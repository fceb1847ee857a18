pub mod app;
mod error;
mod routes;

pub use error::{ApiError, ApiResponse};
