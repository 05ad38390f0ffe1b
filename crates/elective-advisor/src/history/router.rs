use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::HistoryEntry;
use super::store::{AppendOutcome, HistoryStore};
use crate::auth::credential_from_headers;
use crate::context::AppContext;
use crate::recommend::{ModelGateway, Recommendation, StudentProfile};

/// Router for per-identity recommendation history.
pub fn history_router<M, H>(context: Arc<AppContext<M, H>>) -> Router
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    Router::new()
        .route(
            "/api/history",
            get(list_handler::<M, H>).post(append_handler::<M, H>),
        )
        .with_state(context)
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryPage {
    pub(crate) history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppendRequest {
    pub(crate) input: StudentProfile,
    #[serde(default)]
    pub(crate) results: Vec<Recommendation>,
}

pub(crate) async fn list_handler<M, H>(
    State(context): State<Arc<AppContext<M, H>>>,
    headers: HeaderMap,
) -> Json<HistoryPage>
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    let identity = context
        .sessions
        .resolve(credential_from_headers(&headers).as_deref());
    Json(HistoryPage {
        history: context.history.list(&identity.id).await,
    })
}

/// The one place a persistence failure is surfaced; the recommendation
/// endpoint's own history write stays best-effort.
pub(crate) async fn append_handler<M, H>(
    State(context): State<Arc<AppContext<M, H>>>,
    headers: HeaderMap,
    Json(request): Json<AppendRequest>,
) -> Response
where
    M: ModelGateway + 'static,
    H: HistoryStore + 'static,
{
    let identity = context
        .sessions
        .resolve(credential_from_headers(&headers).as_deref());

    let entry = HistoryEntry {
        ts: Utc::now(),
        input: request.input,
        results: request.results,
    };

    match context.history.append(&identity.id, entry).await {
        AppendOutcome::Persisted => Json(json!({ "ok": true })).into_response(),
        AppendOutcome::PersistFailed(reason) => {
            warn!(identity = %identity.id, %reason, "explicit history write failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false })),
            )
                .into_response()
        }
    }
}
