//! Customer Churn Prediction Server
//!
//! Single-page form over pre-fitted preprocessors and a trained classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  CUSTOMER CHURN PREDICTION                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌───────────┐          │
//! │  │  Form /    │──▶│  Feature     │──▶│ Predictor │──▶ Result │
//! │  │  JSON API  │   │  Assembler   │   │           │   Presenter│
//! │  └────────────┘   └──────┬───────┘   └─────┬─────┘          │
//! │                          ▼                 ▼                 │
//! │                 ┌──────────────────────────────────┐         │
//! │                 │ Artifact Store (loaded at start) │         │
//! │                 └──────────────────────────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod artifacts;
mod config;
mod constants;
mod error;
mod features;
mod handlers;
mod model;
mod pipeline;
mod presenter;
mod ui;

#[cfg(test)]
mod testutil;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::artifacts::ArtifactStore;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so RUST_LOG from .env reaches the filter
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "churn_predict=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("{} v{} starting...", constants::APP_NAME, constants::APP_VERSION);
    tracing::info!("Environment: {}", config.environment);

    // Artifacts are required: no artifacts, no server
    let artifacts = ArtifactStore::load(&config.artifact_paths())
        .with_context(|| format!("failed to load artifacts from {}", config.artifact_dir.display()))?;

    // Build application state
    let state = AppState {
        artifacts: Arc::new(artifacts),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let ip = config.bind_addr.parse()
        .with_context(|| format!("invalid BIND_ADDR {}", config.bind_addr))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ArtifactStore>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Form routes (server-rendered page)
    let form_routes = Router::new()
        .route("/", get(handlers::form::index))
        .route("/predict", post(handlers::form::submit));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::api::predict))
        .route("/api/v1/options", get(handlers::api::options))
        .route("/api/v1/status", get(handlers::api::status))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        );

    // Combine all routes
    Router::new()
        .merge(form_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::handlers::api::{OptionsResponse, PredictResponse, StatusResponse};
    use crate::presenter::Verdict;
    use crate::testutil::{fixture_store, scenario_input, stub_store};

    fn app(store: ArtifactStore) -> Router {
        create_router(AppState {
            artifacts: Arc::new(store),
            config: config::Config::default(),
        })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let (_dir, store) = fixture_store();
        let response = app(store)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Customer Churn Prediction"));
        assert!(html.contains("<option value=\"Germany\""));
    }

    #[tokio::test]
    async fn test_form_submit_shows_result() {
        let (_dir, store) = stub_store(0.73);
        let body = "CreditScore=650&Geography=France&Gender=Female&Age=40&Tenure=3\
                    &Balance=50000&NumOfProducts=2&HasCrCard=Yes&IsActiveMember=Yes\
                    &EstimatedSalary=60000";
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let response = app(store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Churn Probability"));
        assert!(html.contains("73.00%"));
        assert!(html.contains("The customer is likely to churn."));
    }

    #[tokio::test]
    async fn test_form_submit_unknown_gender_shows_error() {
        let (_dir, store) = fixture_store();
        let body = "CreditScore=650&Geography=France&Gender=Unknown&Age=40&Tenure=3\
                    &Balance=50000&NumOfProducts=2&HasCrCard=Yes&IsActiveMember=Yes\
                    &EstimatedSalary=60000";
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let html = body_string(app(store).oneshot(request).await.unwrap()).await;
        assert!(html.contains("banner error"));
        assert!(html.contains("not a known Gender category"));
        assert!(!html.contains("Churn Probability"));
    }

    #[tokio::test]
    async fn test_api_predict() {
        let (_dir, store) = fixture_store();
        let body = serde_json::to_value(scenario_input()).unwrap();

        let response = app(store)
            .oneshot(json_request("/api/v1/predict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let parsed: PredictResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!((0.0..=1.0).contains(&parsed.result.probability));
        assert!(parsed.result.percentage.ends_with('%'));
        assert_eq!(parsed.result.verdict, Verdict::from_probability(parsed.result.probability));
    }

    #[tokio::test]
    async fn test_api_predict_stub_verdict() {
        let (_dir, store) = stub_store(0.5);
        let body = serde_json::to_value(scenario_input()).unwrap();

        let response = app(store)
            .oneshot(json_request("/api/v1/predict", body))
            .await
            .unwrap();

        let parsed: PredictResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(parsed.result.percentage, "50.00%");
        assert_eq!(parsed.result.verdict, Verdict::NotLikelyToChurn);
    }

    #[tokio::test]
    async fn test_api_unknown_gender_is_422() {
        let (_dir, store) = fixture_store();
        let mut input = scenario_input();
        input.gender = "Unknown".into();

        let response = app(store)
            .oneshot(json_request("/api/v1/predict", serde_json::to_value(input).unwrap()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], 422);
    }

    #[tokio::test]
    async fn test_api_out_of_range_is_400() {
        let (_dir, store) = fixture_store();
        let mut input = scenario_input();
        input.age = 120;

        let response = app(store)
            .oneshot(json_request("/api/v1/predict", serde_json::to_value(input).unwrap()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_malformed_body_is_json_400() {
        let (_dir, store) = fixture_store();
        let mut body = serde_json::to_value(scenario_input()).unwrap();
        body["HasCrCard"] = "Maybe".into();

        let response = app(store)
            .oneshot(json_request("/api/v1/predict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().unwrap().contains("HasCrCard"));
    }

    #[tokio::test]
    async fn test_form_submit_unparseable_field_shows_error() {
        let (_dir, store) = fixture_store();
        let body = "CreditScore=650&Geography=Spain&Gender=Male&Age=abc&Tenure=3\
                    &Balance=50000&NumOfProducts=2&HasCrCard=Yes&IsActiveMember=Yes\
                    &EstimatedSalary=60000";
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let response = app(store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("banner error"));
        assert!(html.contains("Failed to deserialize form"));
        assert!(!html.contains("Churn Probability"));
    }

    #[tokio::test]
    async fn test_api_options_and_status() {
        let (_dir, store) = fixture_store();
        let app = app(store);

        let response = app.clone()
            .oneshot(Request::get("/api/v1/options").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let options: OptionsResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(options.geography, ["France", "Germany", "Spain"]);
        assert_eq!(options.credit_score.min, 300);
        assert_eq!(options.num_of_products.max, 4);

        let response = app
            .oneshot(Request::get("/api/v1/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status: StatusResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(status.backend, "dense");
        assert_eq!(status.input_width, 12);
        assert_eq!(status.schema.columns.len(), 12);
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, store) = fixture_store();
        let response = app(store)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        tokio_test::assert_ok!(serde_json::from_str::<serde_json::Value>(&body_string(response).await));
    }
}
