use std::{collections::BTreeMap, sync::Arc};

use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

async fn capture_and_predict(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    Json(json!({
        "success": true,
        "prediction": {
            "first_week_views": 4200,
            "confidence": 0.83,
            "accuracy": 88.2,
            "range": { "min": 3780, "max": 4620 },
            "margin": 420
        },
        "recommendations": [
            {
                "priority": "high",
                "message": "Title too short",
                "suggestion": "Aim for 50-60 characters"
            }
        ],
        "features_used": 52,
        "model_info": { "model_name": "XGBoost", "cv_score": 0.71, "r2_score": 0.71 }
    }))
}

async fn spawn_server(app: Router) -> std::io::Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}")).expect("server url"))
}

fn sample_request() -> PredictionRequest {
    PredictionRequest {
        title: "Learning Rust".to_string(),
        publish_date: "2025-01-02T03:04:00.000Z".to_string(),
        publish_hour: 15,
        duration_minutes: 12.5,
        tag_count: 8.0,
        channel_subscribers: 120000.0,
        channel_video_count: 340.0,
        extra: BTreeMap::from([("category".to_string(), "Education".to_string())]),
    }
}

#[tokio::test]
async fn predict_posts_json_and_decodes_success() {
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/api/predict", post(capture_and_predict))
        .with_state(state);
    let base = spawn_server(app).await.expect("spawn server");

    let service = HttpPredictionService::new(base);
    let response = service.predict(&sample_request()).await.expect("predict");

    assert!(response.success);
    let prediction = response.prediction.expect("prediction");
    assert_eq!(prediction.first_week_views, 4200.0);
    assert_eq!(prediction.margin, Some(420.0));
    assert_eq!(response.features_used, 52);
    assert_eq!(
        response
            .model_info
            .and_then(|info| info.model_name)
            .as_deref(),
        Some("XGBoost")
    );

    let payload = rx.await.expect("payload");
    assert_eq!(payload["title"], "Learning Rust");
    assert_eq!(payload["publish_hour"], 15);
    assert_eq!(payload["channel_subscribers"], 120000.0);
    assert_eq!(payload["category"], "Education");
}

#[tokio::test]
async fn predict_decodes_failure_bodies_on_error_statuses() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": "could not convert string to float" })),
            )
        }),
    );
    let base = spawn_server(app).await.expect("spawn server");

    let response = HttpPredictionService::new(base)
        .predict(&sample_request())
        .await
        .expect("body should decode");
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("could not convert string to float")
    );
}

#[tokio::test]
async fn missing_success_flag_reads_as_failure() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Model not loaded. Please train the model first." })),
            )
        }),
    );
    let base = spawn_server(app).await.expect("spawn server");

    let response = HttpPredictionService::new(base)
        .predict(&sample_request())
        .await
        .expect("body should decode");
    assert!(!response.success);
    assert!(response.prediction.is_none());
}

#[tokio::test]
async fn undecodable_body_is_a_transport_error() {
    let app = Router::new().route("/api/predict", post(|| async { "<html>oops</html>" }));
    let base = spawn_server(app).await.expect("spawn server");

    let err = HttpPredictionService::new(base)
        .predict(&sample_request())
        .await
        .expect_err("html is not a prediction");
    assert!(matches!(err, TransportError::Decode { status: 200, .. }));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).expect("url");
    let err = HttpPredictionService::new(base)
        .predict(&sample_request())
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, TransportError::Request { .. }));
}

#[tokio::test]
async fn health_and_model_info_respect_base_path() {
    let app = Router::new()
        .route(
            "/svc/api/health",
            get(|| async { Json(json!({ "status": "healthy", "model_loaded": false })) }),
        )
        .route(
            "/svc/api/model-info",
            get(|| async {
                Json(json!({
                    "model_name": "LightGBM",
                    "training_date": "2025-01-01",
                    "feature_count": 61
                }))
            }),
        );
    let base = spawn_server(app).await.expect("spawn server");
    let service = HttpPredictionService::new(base.join("svc").expect("prefixed url"));
    assert!(service.base_url().path().ends_with("/svc/"));

    let health = service.health().await.expect("health");
    assert!(!health.model_loaded);

    let info = service.model_info().await.expect("model info");
    assert_eq!(info.model_name, "LightGBM");
    assert_eq!(info.feature_count, 61);
}

#[tokio::test]
async fn model_info_error_body_becomes_api_error() {
    let app = Router::new().route(
        "/api/model-info",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorBody::new("Model not loaded")),
            )
        }),
    );
    let base = spawn_server(app).await.expect("spawn server");

    let err = HttpPredictionService::new(base)
        .model_info()
        .await
        .expect_err("model missing");
    match err {
        ServiceError::Api(api) => {
            assert_eq!(api.status, 500);
            assert_eq!(api.message, "Model not loaded");
        }
        other => panic!("unexpected error: {other}"),
    }
}
