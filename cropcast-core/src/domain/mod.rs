//! Domain types for CropCast

pub mod key;
pub mod observation;
pub mod series;

pub use key::CropStateKey;
pub use observation::{round2, ForecastPoint, PriceObservation};
pub use series::{PriceSeries, SeriesError};
