//! Route handlers and their JSON shapes.
//!
//! Query parameters arrive as optional strings and are validated here, so a
//! missing or malformed parameter yields the same `{"detail": ...}` body as
//! an engine error rather than axum's plain-text rejection.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use cropcast_core::{ForecastPoint, Horizon, TrendLabel};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Price unit of every reported value.
pub const UNIT: &str = "₹ per quintal";

#[derive(Debug, Deserialize)]
pub struct StatesQuery {
    pub crop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub crop: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub crop: Option<String>,
    pub state: Option<String>,
    pub days: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CropsResponse {
    pub crops: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub states: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub crop: String,
    pub state: String,
    pub predicted_price: f64,
    pub unit: &'static str,
    pub horizon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub success: bool,
    pub crop: String,
    pub state: String,
    pub days: u32,
    pub start_price: f64,
    pub end_price: f64,
    /// `null` when the start price is zero.
    pub percent_change: Option<f64>,
    pub trend: TrendLabel,
    pub trend_emoji: &'static str,
    pub unit: &'static str,
    pub daily_forecast: Vec<ForecastPoint>,
}

/// Non-empty, trimmed value of a required parameter.
fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing required query parameter: {name}")))
}

/// GET /api
pub async fn status() -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": "CropCast Price Forecast API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "predict": "/api/predict?crop={crop}&state={state}",
            "forecast": "/api/forecast?crop={crop}&state={state}&days={days}",
            "crops": "/api/crops",
            "states": "/api/states"
        }
    }))
}

/// GET /api/crops
pub async fn crops(State(state): State<AppState>) -> Json<CropsResponse> {
    Json(CropsResponse {
        crops: state.crops.as_ref().clone(),
    })
}

/// GET /api/states
pub async fn states(
    State(state): State<AppState>,
    Query(query): Query<StatesQuery>,
) -> Json<StatesResponse> {
    let crop = query.crop.as_deref().map(str::trim).filter(|c| !c.is_empty());
    Json(StatesResponse {
        states: state.forecaster.history().states(crop),
    })
}

/// GET /api/predict
pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> ApiResult<Json<PredictResponse>> {
    let crop = required(query.crop, "crop")?;
    let region = required(query.state, "state")?;

    let point = state.forecaster.predict_next(&crop, &region)?;
    Ok(Json(PredictResponse {
        success: true,
        crop,
        state: region,
        predicted_price: point.price,
        unit: UNIT,
        horizon: "next day",
    }))
}

/// GET /api/forecast
pub async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Json<ForecastResponse>> {
    let crop = required(query.crop, "crop")?;
    let region = required(query.state, "state")?;
    let horizon = match query.days {
        Some(days) => days.parse::<Horizon>()?,
        None => Horizon::DEFAULT,
    };

    let result = state.forecaster.forecast(&crop, &region, horizon)?;
    Ok(Json(ForecastResponse {
        success: true,
        crop,
        state: region,
        days: horizon.days(),
        start_price: result.start_price,
        end_price: result.end_price,
        percent_change: result.trend.percent_change,
        trend: result.trend.label,
        trend_emoji: result.trend.emoji(),
        unit: UNIT,
        daily_forecast: result.points,
    }))
}
