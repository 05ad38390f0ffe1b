use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use elective_advisor::context::AppContext;
use elective_advisor::history::{history_router, HistoryStore};
use elective_advisor::recommend::{recommendation_router, ModelGateway};
use serde_json::json;
use std::sync::Arc;

/// Compose the library routers with the operational endpoints.
pub(crate) fn with_api_routes<M, H>(context: Arc<AppContext<M, H>>) -> axum::Router
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    recommendation_router(context.clone())
        .merge(history_router(context))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::OfflineGateway;
    use axum::body::Body;
    use axum::http::Request;
    use elective_advisor::auth::SessionResolver;
    use elective_advisor::catalog::CatalogLoader;
    use elective_advisor::history::FileHistoryStore;
    use elective_advisor::recommend::{FixedJitter, HeuristicScorer, RecommendationService};
    use tower::ServiceExt;

    fn test_router() -> (axum::Router, tempfile::TempDir) {
        let catalog = CatalogLoader::new("/nonexistent/syllabus.json");
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let recommendations = RecommendationService::new(catalog, scorer, OfflineGateway);
        let sessions = SessionResolver::new("routes-test-secret");
        let temp = tempfile::tempdir().expect("temp dir");
        let history = FileHistoryStore::new(temp.path().join("history.json"));
        let context = Arc::new(AppContext::new(recommendations, sessions, history));
        (with_api_routes(context), temp)
    }

    #[tokio::test]
    async fn healthcheck_answers_ok() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn recommend_endpoint_is_mounted() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::post("/api/recommend")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        // Empty catalog + offline gateway still answers 200 with a valid set.
        assert_eq!(response.status(), StatusCode::OK);
    }
}
