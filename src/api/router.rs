use axum::{
    http::{HeaderName, Method},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::{device_id_middleware, logging_middleware, DEVICE_ID_HEADER};
use super::state::AppState;
use super::v1;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors_layer())
                .layer(middleware::from_fn(logging_middleware))
                .layer(middleware::from_fn(device_id_middleware)),
        )
}

/// The signal page is served from another origin; it must be able to read
/// the assigned device id
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(DEVICE_ID_HEADER)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MarketConfig, SupportConfig};
    use crate::domain::{
        AllowList, AnomalyConfig, KeyEntry, KeyState, SubscriptionConfig,
    };
    use crate::infrastructure::access_key::KeyLifecycleService;
    use crate::infrastructure::anomaly::AntiSharingService;
    use crate::infrastructure::gate::AccessGate;
    use crate::infrastructure::key_state::StorageKeyStateRepository;
    use crate::infrastructure::signal::CsvSignalSource;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::usage::InMemoryUsageLog;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const KEY: &str = "EIGEN-2026-ALPHA";

    fn app(dir: &tempfile::TempDir, anomaly: AnomalyConfig) -> Router {
        let states = Arc::new(StorageKeyStateRepository::new(Arc::new(
            InMemoryStorage::<KeyState>::new(),
        )));
        let log = Arc::new(InMemoryUsageLog::default());
        let allow_list = AllowList::new()
            .with_key(KEY, KeyEntry::default())
            .with_key("OLD-KEY", KeyEntry::disabled());

        let lifecycle = Arc::new(KeyLifecycleService::new(
            states.clone(),
            allow_list,
            SubscriptionConfig::default(),
        ));
        let anti_sharing = Arc::new(AntiSharingService::new(states, log.clone(), anomaly));
        let gate = Arc::new(AccessGate::new(lifecycle, anti_sharing, log));
        let signals = Arc::new(CsvSignalSource::new(
            dir.path().join("signals.csv"),
            dir.path().join("equity.csv"),
        ));

        create_router(AppState::new(
            gate,
            signals,
            MarketConfig::default(),
            SupportConfig::default(),
        ))
    }

    fn write_signals(dir: &tempfile::TempDir) {
        std::fs::write(
            dir.path().join("signals.csv"),
            "symbol,score,name\n600519,0.95,Moutai\n2594,0.91,BYD\n300750,0.9,CATL\n1,0.5,\n",
        )
        .unwrap();
    }

    fn get(uri: &str, key: Option<&str>, device: &str) -> Request<Body> {
        let mut builder = Request::builder().uri(uri).header("x-device-id", device);
        if let Some(key) = key {
            builder = builder.header("x-access-key", key);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/health", None, "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_degraded_without_signal_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/ready", None, "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "degraded");
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/v1/access/validate")
            .header("content-type", "application/json")
            .header("x-device-id", "dev-a")
            .body(Body::from(r#"{"key": " eigen-2026-alpha "}"#))
            .unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], true);
        assert_eq!(json["days_remaining"], 30);
        assert_eq!(json["key_mask"], "EIGEN-20****LPHA");
        assert_eq!(json["reason"], "Access key activated, valid for 30 days");
    }

    #[tokio::test]
    async fn test_validate_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/v1/access/validate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"key": "nope"}"#))
            .unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_key");
    }

    #[tokio::test]
    async fn test_signals_require_key() {
        let dir = tempfile::tempdir().unwrap();
        write_signals(&dir);

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/signals", None, "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "missing_key");
    }

    #[tokio::test]
    async fn test_disabled_key_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        write_signals(&dir);

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/signals", Some("old-key"), "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_signals_with_key() {
        let dir = tempfile::tempdir().unwrap();
        write_signals(&dir);

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/signals", Some(KEY), "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["access"]["key_mask"], "EIGEN-20****LPHA");
        assert_eq!(json["featured"]["symbol"], "600519");
        assert_eq!(json["silver"][0]["symbol"], "002594");
        assert_eq!(json["silver"][0]["chart_symbol"], "SZSE:002594");
        assert_eq!(json["other"][0]["name"], "000001");
    }

    #[tokio::test]
    async fn test_signals_file_missing() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/signals", Some(KEY), "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_sharing_warning_then_block() {
        let dir = tempfile::tempdir().unwrap();
        write_signals(&dir);

        let warn_app = app(&dir, AnomalyConfig::default());
        for device in ["dev-a", "dev-b"] {
            let response = warn_app
                .clone()
                .oneshot(get("/v1/signals", Some(KEY), device))
                .await
                .unwrap();
            assert!(body_json(response).await["access"].get("warning").is_none());
        }
        let response = warn_app
            .oneshot(get("/v1/signals", Some(KEY), "dev-c"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["access"]["warning"].is_string());

        let block_app = app(
            &dir,
            AnomalyConfig::default().with_policy(crate::domain::AnomalyPolicy::Block),
        );
        for device in ["dev-a", "dev-b"] {
            block_app
                .clone()
                .oneshot(get("/v1/signals", Some(KEY), device))
                .await
                .unwrap();
        }
        let response = block_app
            .oneshot(get("/v1/signals", Some(KEY), "dev-c"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"]["code"], "key_blocked");
    }

    #[tokio::test]
    async fn test_backtest_unavailable_without_equity_file() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/backtest", Some(KEY), "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["available"], false);
    }

    #[tokio::test]
    async fn test_backtest_summary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("equity.csv"),
            "date,equity\n2026-01-02,100\n2026-02-02,125\n",
        )
        .unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/backtest", Some(KEY), "dev-a"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["available"], true);
        assert_eq!(json["summary"]["initial"], 100.0);
        assert_eq!(json["summary"]["final"], 125.0);
        assert_eq!(json["summary"]["total_return_pct"], 25.0);
    }

    #[tokio::test]
    async fn test_chart_is_public() {
        let dir = tempfile::tempdir().unwrap();
        write_signals(&dir);

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/chart", None, "dev-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
        assert_eq!(json["widget"]["symbol"], "SSE:600519");
    }

    #[tokio::test]
    async fn test_chart_for_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir, AnomalyConfig::default());

        let response = app
            .clone()
            .oneshot(get("/v1/chart/300750", None, "dev-a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["symbol"], "SZSE:300750");
        assert_eq!(json["interval"], "D");
        assert_eq!(json["timezone"], "Asia/Shanghai");

        let response = app
            .oneshot(get("/v1/chart/60051X", None, "dev-a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_support_page() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/support", None, "dev-a"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["validity_days"], 30);
        assert!(!json["disclaimer"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_device_id_assigned_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .uri("/v1/support")
            .body(Body::empty())
            .unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(request)
            .await
            .unwrap();

        let device_id = response.headers().get("x-device-id").unwrap();
        assert!(uuid::Uuid::parse_str(device_id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_device_id_not_echoed_when_sent() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/v1/support", None, "dev-a"))
            .await
            .unwrap();

        assert!(response.headers().get("x-device-id").is_none());
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir, AnomalyConfig::default())
            .oneshot(get("/live", None, "dev-a"))
            .await
            .unwrap();

        assert!(response.headers().get("x-request-id").is_some());
    }
}
