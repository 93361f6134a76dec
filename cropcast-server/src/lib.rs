//! CropCast Server: axum HTTP API over the forecast engine.
//!
//! Endpoints (all `GET`, JSON):
//! - `/api`: service status and endpoint index
//! - `/api/crops`: configured crop catalog
//! - `/api/states?crop=`: states with price history, optionally for one crop
//! - `/api/predict?crop=&state=`: next-day price
//! - `/api/forecast?crop=&state=&days=`: N-day recursive forecast with trend
//!
//! Failures are `{"detail": message}` with 404 for an untrained pair, 400 for
//! other request problems and 500 when the model registry cannot load.

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{create_app, serve};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
