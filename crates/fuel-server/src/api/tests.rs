use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use fuel_core::polyline::encode;
use fuel_core::spatial::miles_to_equatorial_degrees;
use fuel_core::{GeoPoint, StationCatalog};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn equator_geometry(miles: usize) -> String {
    let points: Vec<GeoPoint> = (0..=miles)
        .map(|i| GeoPoint::new(0.0, miles_to_equatorial_degrees(i as f64)))
        .collect();
    encode(&points).expect("encode")
}

fn station_json(id: &str, mile: f64, price: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Stop {id}"),
        "address": "I-40",
        "city": "Amarillo",
        "state": "TX",
        "lat": 0.0,
        "lon": miles_to_equatorial_degrees(mile),
        "price": price
    })
}

fn setup_app(stations: Value) -> (axum::Router, Arc<AppState>) {
    let catalog = StationCatalog::from_json_str(&stations.to_string()).expect("catalog");
    let state = Arc::new(AppState::with_catalog(Config::default(), catalog));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_plan(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/routes/plan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trip-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trip-42");
}

#[tokio::test]
async fn request_id_is_generated_when_missing() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(post_plan(json!({"geometry": "", "distance_miles": 1000.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let id = response.headers()["x-request-id"].to_str().expect("ascii id");
    assert!(uuid::Uuid::parse_str(id).is_ok(), "{id}");
}

#[tokio::test]
async fn plans_thousand_mile_route() {
    let (app, _state) = setup_app(json!([
        station_json("480", 480.0, 3.00),
        station_json("490", 490.0, 2.80)
    ]));

    let response = app
        .oneshot(post_plan(json!({
            "geometry": equator_geometry(1000),
            "distance_miles": 1000.0
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["catalog_size"], 2);
    assert_eq!(body["stops"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["stops"][0]["station"]["id"], "490");
    assert_eq!(body["total_fuel_cost"], 350.0);
    assert_eq!(body["feature_collection"]["type"], "FeatureCollection");
}

#[tokio::test]
async fn plans_from_directions_body() {
    let (app, _state) = setup_app(json!([station_json("mid", 400.0, 3.0)]));
    let response = app
        .oneshot(post_plan(json!({
            "directions": {
                "routes": [{
                    "geometry": equator_geometry(1000),
                    "segments": [{"distance": 1_609_344.0}]
                }]
            }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["stops"][0]["station"]["id"], "mid");
}

#[tokio::test]
async fn request_overrides_apply() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(post_plan(json!({
            "geometry": equator_geometry(400),
            "distance_miles": 400.0,
            "options": {
                "miles_per_gallon": 8.0,
                "fuel_pricing": {"mode": "fixed", "price_per_gallon": 4.0}
            }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_fuel_cost"], 200.0);
}

#[tokio::test]
async fn empty_geometry_is_unprocessable() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(post_plan(json!({"geometry": "", "distance_miles": 1000.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["error"], "empty_geometry");
}

#[tokio::test]
async fn empty_catalog_on_long_route_is_unprocessable() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(post_plan(json!({
            "geometry": equator_geometry(1000),
            "distance_miles": 1000.0
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["error"], "insufficient_station_data");
}

#[tokio::test]
async fn invalid_rules_are_bad_request() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(post_plan(json!({
            "geometry": equator_geometry(10),
            "distance_miles": 10.0,
            "options": {"max_range_miles": 0.0}
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "invalid_config");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (app, _state) = setup_app(json!([]));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/routes/plan")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn station_catalog_can_be_replaced() {
    let (app, state) = setup_app(json!([station_json("old", 100.0, 3.0)]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/v1/stations")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!([
                        station_json("a", 100.0, 3.0),
                        station_json("b", 200.0, 3.1),
                        {"id": "no-coordinates", "price": 2.0}
                    ])
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["accepted"], 2);
    assert_eq!(body["skipped"], 1);
    assert!(state.catalog().get("old").is_none());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/v1/stations").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["skipped"], 1);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/v1/stations/b").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["price_per_gallon"], 3.1);

    let response = app
        .oneshot(Request::builder().uri("/v1/stations/zzz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn station_catalog_accepts_csv_export() {
    let (app, state) = setup_app(json!([station_json("old", 100.0, 3.0)]));

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/v1/stations")
                .header("content-type", "text/csv")
                .body(Body::from(
                    "OPIS Truckstop ID,Truckstop Name,City,State,Retail Price,Latitude,Longitude\n\
                     501,Loves,Amarillo,TX,3.05,35.2,-101.8\n\
                     502,Pilot,Amarillo,TX,,35.2,-101.9\n",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["accepted"], 1);
    assert_eq!(body["skipped"], 1);
    assert_eq!(state.catalog().get("501").map(|s| s.city.clone()), Some("Amarillo".to_string()));
}

#[tokio::test]
async fn absurd_reported_distance_is_unprocessable() {
    let (app, _state) = setup_app(json!([station_json("a", 400.0, 3.0)]));
    let response = app
        .oneshot(post_plan(json!({
            "geometry": equator_geometry(1000),
            "distance_miles": 1e18
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["error"], "distance_mismatch");
}
