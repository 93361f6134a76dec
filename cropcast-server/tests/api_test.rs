//! In-process HTTP tests: the router is driven with `oneshot`, no socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cropcast_core::data::InMemoryHistoryStore;
use cropcast_core::features::FeatureVector;
use cropcast_core::model::FnRegressor;
use cropcast_core::{
    CropStateKey, Forecaster, ModelEntry, ModelRegistry, PriceObservation, PriceSeries,
};
use cropcast_server::{create_app, AppState};

fn flat(days: usize, price: f64) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PriceSeries::new(
        (0..days)
            .map(|i| PriceObservation::new(start + Duration::days(i as i64), price))
            .collect(),
    )
    .unwrap()
}

fn store() -> InMemoryHistoryStore {
    let mut store = InMemoryHistoryStore::new();
    store.insert(CropStateKey::new("Potato", "Punjab"), flat(60, 1200.0));
    store.insert(CropStateKey::new("Onion", "Gujarat"), flat(45, 900.0));
    store.insert(CropStateKey::new("Wheat", "Punjab"), flat(10, 2100.0));
    store.insert(CropStateKey::new("Tomato", "Karnataka"), flat(40, 800.0));
    store
}

fn app() -> Router {
    let registry = ModelRegistry::from_entries([
        ModelEntry::new(
            CropStateKey::new("Potato", "Punjab"),
            Arc::new(FnRegressor::new("step", |v: &FeatureVector| v.lag_1 + 5.0)),
        ),
        ModelEntry::new(
            CropStateKey::new("Onion", "Gujarat"),
            Arc::new(FnRegressor::new("zero", |_: &FeatureVector| 0.0)),
        ),
        ModelEntry::new(
            CropStateKey::new("Wheat", "Punjab"),
            Arc::new(FnRegressor::new("copy", |v: &FeatureVector| v.lag_1)),
        ),
    ]);
    let forecaster = Forecaster::new(Arc::new(registry), Arc::new(store()));
    create_app(AppState::new(
        forecaster,
        vec!["Potato".into(), "Onion".into(), "Wheat".into()],
    ))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn status_lists_endpoints() {
    let (status, body) = get(app(), "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["endpoints"]["crops"], "/api/crops");
}

#[tokio::test]
async fn crops_come_from_catalog() {
    let (status, body) = get(app(), "/api/crops").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "crops": ["Potato", "Onion", "Wheat"] }));
}

#[tokio::test]
async fn states_all_and_by_crop() {
    let (_, all) = get(app(), "/api/states").await;
    assert_eq!(
        all,
        serde_json::json!({ "states": ["Gujarat", "Karnataka", "Punjab"] })
    );

    let (_, potato) = get(app(), "/api/states?crop=Potato").await;
    assert_eq!(potato, serde_json::json!({ "states": ["Punjab"] }));

    let (status, none) = get(app(), "/api/states?crop=Mango").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, serde_json::json!({ "states": [] }));
}

#[tokio::test]
async fn predict_next_day() {
    let (status, body) = get(app(), "/api/predict?crop=Potato&state=Punjab").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["crop"], "Potato");
    assert_eq!(body["state"], "Punjab");
    assert_eq!(body["predicted_price"].as_f64(), Some(1205.0));
    assert_eq!(body["unit"], "₹ per quintal");
    assert_eq!(body["horizon"], "next day");
}

#[tokio::test]
async fn predict_unknown_pair_is_404() {
    let (status, body) = get(app(), "/api/predict?crop=Rice&state=Unknown%20Region").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "model not found for Rice in Unknown Region");
}

#[tokio::test]
async fn predict_missing_state_is_400() {
    let (status, body) = get(app(), "/api/predict?crop=Potato").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "missing required query parameter: state");
}

#[tokio::test]
async fn forecast_defaults_to_a_week() {
    let (status, body) = get(app(), "/api/forecast?crop=Potato&state=Punjab").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 7);

    let daily = body["daily_forecast"].as_array().unwrap();
    assert_eq!(daily.len(), 7);
    assert_eq!(daily[0]["date"], "2024-03-01");
    assert_eq!(daily[6]["date"], "2024-03-07");
    assert_eq!(daily[6]["price"].as_f64(), Some(1235.0));

    assert_eq!(body["start_price"].as_f64(), Some(1205.0));
    assert_eq!(body["end_price"].as_f64(), Some(1235.0));
    // 30 / 1205 * 100
    assert_eq!(body["percent_change"].as_f64(), Some(2.49));
    assert_eq!(body["trend"], "Upward");
    assert_eq!(body["trend_emoji"], "📈");
    assert_eq!(body["unit"], "₹ per quintal");
}

#[tokio::test]
async fn one_day_forecast_is_stable() {
    let (status, body) = get(app(), "/api/forecast?crop=Potato&state=Punjab&days=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["start_price"], body["end_price"]);
    assert_eq!(body["percent_change"].as_f64(), Some(0.0));
    assert_eq!(body["trend"], "Stable");
    assert_eq!(body["trend_emoji"], "➝");
}

#[tokio::test]
async fn thirty_days_is_allowed() {
    let (status, body) = get(app(), "/api/forecast?crop=Potato&state=Punjab&days=30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_forecast"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn out_of_range_days_rejected() {
    for days in ["0", "31", "-1"] {
        let uri = format!("/api/forecast?crop=Potato&state=Punjab&days={days}");
        let (status, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}");
        assert_eq!(body["detail"], "days must be between 1 and 30");
    }

    let (status, body) = get(app(), "/api/forecast?crop=Potato&state=Punjab&days=week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("integer"));
}

#[tokio::test]
async fn zero_start_price_reports_null_percent() {
    let (status, body) = get(app(), "/api/forecast?crop=Onion&state=Gujarat&days=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["percent_change"].is_null());
    assert_eq!(body["trend"], "Stable");
}

#[tokio::test]
async fn short_history_is_400() {
    let (status, body) = get(app(), "/api/forecast?crop=Wheat&state=Punjab").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("not enough price history for Wheat in Punjab"));
}

#[tokio::test]
async fn registry_failure_is_500() {
    let forecaster = Forecaster::new(
        Arc::new(ModelRegistry::from_dir("/nonexistent/cropcast-models")),
        Arc::new(store()),
    );
    let app = create_app(AppState::new(forecaster, vec![]));
    let (status, body) = get(app, "/api/predict?crop=Potato&state=Punjab").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("model registry unavailable"));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/crops")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
