use async_trait::async_trait;
use elective_advisor::recommend::{
    CourseList, DropoutRisks, GradeFeatures, GradePrediction, ModelGateway, ModelGatewayError,
    Recommendation, StudentProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Gateway that never reaches a model service. The demo (and router tests)
/// use it to stay on the heuristic path without network access.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OfflineGateway;

#[async_trait]
impl ModelGateway for OfflineGateway {
    async fn recommend(
        &self,
        _profile: &StudentProfile,
    ) -> Result<Vec<Recommendation>, ModelGatewayError> {
        Err(ModelGatewayError::Unavailable("offline mode".to_string()))
    }

    async fn predict(
        &self,
        _features: &GradeFeatures,
    ) -> Result<GradePrediction, ModelGatewayError> {
        Err(ModelGatewayError::Unavailable("offline mode".to_string()))
    }

    async fn dropout_risk(
        &self,
        _courses: &CourseList,
    ) -> Result<DropoutRisks, ModelGatewayError> {
        Err(ModelGatewayError::Unavailable("offline mode".to_string()))
    }
}
