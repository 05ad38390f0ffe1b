use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use elective_advisor::auth::SessionResolver;
use elective_advisor::catalog::CatalogLoader;
use elective_advisor::config::{AppConfig, HistoryBackend};
use elective_advisor::context::AppContext;
use elective_advisor::error::AppError;
use elective_advisor::history::{FileHistoryStore, HistoryStore, PostgresHistoryStore};
use elective_advisor::recommend::{
    HeuristicScorer, ModelServiceClient, RecommendationService, UniformJitter,
};
use elective_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // The history backend is chosen exactly once, at startup.
    match config.history.clone() {
        HistoryBackend::Remote { database_url } => {
            let store = PostgresHistoryStore::connect(&database_url)?;
            store.migrate().await?;
            info!("history backed by remote relational store");
            serve(config, store).await
        }
        HistoryBackend::LocalFile { path } => {
            info!(path = %path.display(), "history backed by local file");
            serve(config, FileHistoryStore::new(path)).await
        }
    }
}

async fn serve<H>(config: AppConfig, history: H) -> Result<(), AppError>
where
    H: HistoryStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = ModelServiceClient::from_config(&config.model)?;
    let catalog = CatalogLoader::new(config.catalog.syllabus_path.clone());
    let scorer = HeuristicScorer::new(UniformJitter);
    let recommendations = RecommendationService::new(catalog, scorer, gateway);
    let sessions = SessionResolver::new(&config.auth.jwt_secret);
    let context = Arc::new(AppContext::new(recommendations, sessions, history));

    let app = with_api_routes(context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.model.base_url, "elective advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
