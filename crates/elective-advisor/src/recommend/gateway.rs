//! HTTP client for the remote model service.
//!
//! The service is an opaque collaborator; the only contract is the wire
//! shape and a 2xx status. Anything else is reported to the orchestrator,
//! which recovers locally.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::domain::{Recommendation, RecommendationSet, StudentProfile};
use crate::config::ModelServiceConfig;

/// Remote scoring collaborator.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Full recommendation set for a profile.
    async fn recommend(
        &self,
        profile: &StudentProfile,
    ) -> Result<Vec<Recommendation>, ModelGatewayError>;

    /// Grade prediction passthrough; no local fallback exists for this.
    async fn predict(&self, features: &GradeFeatures)
        -> Result<GradePrediction, ModelGatewayError>;

    /// Dropout risk passthrough; no local fallback exists for this.
    async fn dropout_risk(&self, courses: &CourseList) -> Result<DropoutRisks, ModelGatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelGatewayError {
    #[error("model service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model service answered status {0}")]
    Status(StatusCode),
    #[error("model service unavailable: {0}")]
    Unavailable(String),
}

/// Feature vector for grade prediction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeFeatures {
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradePrediction {
    pub predicted_grade: f64,
}

/// Courses to assess for dropout risk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseList {
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropoutRisks {
    pub risks: Vec<CourseRisk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRisk {
    pub course: String,
    pub dropout_risk: f64,
}

/// reqwest-backed gateway with a bounded per-request timeout so a slow
/// upstream degrades to the fallback path instead of hanging the caller.
pub struct ModelServiceClient {
    client: Client,
    base_url: String,
}

impl ModelServiceClient {
    pub fn from_config(config: &ModelServiceConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ModelGatewayError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(ModelGatewayError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ModelGateway for ModelServiceClient {
    async fn recommend(
        &self,
        profile: &StudentProfile,
    ) -> Result<Vec<Recommendation>, ModelGatewayError> {
        let set: RecommendationSet = self.post_json("/recommend", profile).await?;
        Ok(set.recommendations)
    }

    async fn predict(
        &self,
        features: &GradeFeatures,
    ) -> Result<GradePrediction, ModelGatewayError> {
        self.post_json("/predict", features).await
    }

    async fn dropout_risk(&self, courses: &CourseList) -> Result<DropoutRisks, ModelGatewayError> {
        self.post_json("/risk", courses).await
    }
}
