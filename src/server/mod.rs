pub mod app;
mod deserializers;
pub mod error;
mod extractors;
pub mod quiz;
mod routes;

pub use app::{build_app, run_server, AppState};
pub use error::ApiError;
