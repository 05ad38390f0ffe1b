use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use super::domain::{RecommendationSet, StudentProfile};
use super::gateway::{CourseList, GradeFeatures, ModelGateway};
use crate::auth::{credential_from_headers, Role};
use crate::context::AppContext;
use crate::history::{AppendOutcome, HistoryEntry, HistoryStore};

/// Router for the recommendation surface. Tier failures are handled inside:
/// `/api/recommend` always answers 200 with a well-formed set, while the
/// passthrough endpoints (`/api/predict`, `/api/risk`) have no local tier
/// and report upstream unavailability.
pub fn recommendation_router<M, H>(context: Arc<AppContext<M, H>>) -> Router
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    Router::new()
        .route("/api/recommend", post(recommend_handler::<M, H>))
        .route("/api/analytics", get(analytics_handler))
        .route("/api/at-risk", get(at_risk_handler::<M, H>))
        .route("/api/predict", post(predict_handler::<M, H>))
        .route("/api/risk", post(risk_handler::<M, H>))
        .with_state(context)
}

pub(crate) async fn recommend_handler<M, H>(
    State(context): State<Arc<AppContext<M, H>>>,
    headers: HeaderMap,
    Json(profile): Json<StudentProfile>,
) -> Json<RecommendationSet>
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    let identity = context
        .sessions
        .resolve(credential_from_headers(&headers).as_deref());

    let recommendations = context.recommendations.recommend(&profile).await;

    let entry = HistoryEntry {
        ts: Utc::now(),
        input: profile,
        results: recommendations.clone(),
    };
    if let AppendOutcome::PersistFailed(reason) = context.history.append(&identity.id, entry).await
    {
        warn!(identity = %identity.id, %reason, "recommendation history write failed");
    }

    Json(RecommendationSet { recommendations })
}

/// Demo analytics series consumed by the dashboard.
pub(crate) async fn analytics_handler() -> Json<serde_json::Value> {
    Json(json!({
        "popularity": [
            { "code": "CSE590", "count": 120 },
            { "code": "CSE591", "count": 95 },
            { "code": "CSE690", "count": 60 }
        ],
        "passFail": [
            { "code": "CSE590", "pass": 90, "fail": 10 },
            { "code": "CSE591", "pass": 85, "fail": 15 }
        ],
        "dropout": [
            { "code": "CSE590", "dropout": 0.12 },
            { "code": "CSE591", "dropout": 0.09 },
            { "code": "CSE690", "dropout": 0.15 }
        ]
    }))
}

/// Faculty-only view; the role must come from a verified credential since
/// anonymous callers always resolve as students.
pub(crate) async fn at_risk_handler<M, H>(
    State(context): State<Arc<AppContext<M, H>>>,
    headers: HeaderMap,
) -> Response
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    let identity = context
        .sessions
        .resolve(credential_from_headers(&headers).as_deref());
    if identity.role != Role::Faculty {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Forbidden" })),
        )
            .into_response();
    }

    Json(json!({
        "students": [
            { "name": "Alice", "course": "CSE590", "difficulty": "High", "dropout": 0.62 },
            { "name": "Bob", "course": "CSE690", "difficulty": "Medium", "dropout": 0.51 },
            { "name": "Cara", "course": "CSE591", "difficulty": "High", "dropout": 0.43 }
        ]
    }))
    .into_response()
}

pub(crate) async fn predict_handler<M, H>(
    State(context): State<Arc<AppContext<M, H>>>,
    Json(features): Json<GradeFeatures>,
) -> Response
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    match context.recommendations.model().predict(&features).await {
        Ok(prediction) => Json(prediction).into_response(),
        Err(error) => {
            warn!(%error, "grade prediction upstream failed");
            model_unavailable()
        }
    }
}

pub(crate) async fn risk_handler<M, H>(
    State(context): State<Arc<AppContext<M, H>>>,
    Json(courses): Json<CourseList>,
) -> Response
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    match context.recommendations.model().dropout_risk(&courses).await {
        Ok(risks) => Json(risks).into_response(),
        Err(error) => {
            warn!(%error, "dropout risk upstream failed");
            model_unavailable()
        }
    }
}

fn model_unavailable() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "ML service unavailable" })),
    )
        .into_response()
}
