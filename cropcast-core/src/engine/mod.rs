//! Forecast engine: single-day prediction and the recursive N-day rollout.
//!
//! Request-parallel, computation-sequential. Any number of threads may call
//! into one `Forecaster`; within a call the days are computed in order on a
//! private working series.

pub mod error;
pub mod forecaster;
pub mod horizon;
pub mod result;
pub mod rollout;

pub use error::ForecastError;
pub use forecaster::Forecaster;
pub use horizon::Horizon;
pub use result::ForecastResult;
pub use rollout::{rollout, RolloutStep};
