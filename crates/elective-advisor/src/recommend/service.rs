//! Tiered recommendation orchestration.

use tracing::warn;

use super::domain::{Recommendation, StudentProfile};
use super::gateway::ModelGateway;
use super::scorer::HeuristicScorer;
use crate::catalog::CatalogLoader;

/// Upper bound on the returned recommendation set.
pub const MAX_RECOMMENDATIONS: usize = 8;

/// Sequences the remote model tier and the local heuristic tier. Callers
/// always receive a well-formed, possibly empty, recommendation set; no
/// upstream failure escapes this service.
pub struct RecommendationService<M> {
    catalog: CatalogLoader,
    scorer: HeuristicScorer,
    model: M,
}

impl<M> RecommendationService<M>
where
    M: ModelGateway,
{
    pub fn new(catalog: CatalogLoader, scorer: HeuristicScorer, model: M) -> Self {
        Self {
            catalog,
            scorer,
            model,
        }
    }

    /// Remote model first; any failure there (transport, status, decode) is
    /// logged and recovered locally, never surfaced to the caller.
    pub async fn recommend(&self, profile: &StudentProfile) -> Vec<Recommendation> {
        match self.model.recommend(profile).await {
            Ok(recommendations) => recommendations,
            Err(error) => {
                warn!(%error, "model service unavailable, scoring with local heuristic");
                self.score_locally(profile)
            }
        }
    }

    /// Score every catalog elective, best first, truncated to the cap. An
    /// empty catalog yields an empty set, which is a valid terminal state.
    pub fn score_locally(&self, profile: &StudentProfile) -> Vec<Recommendation> {
        let mut results: Vec<Recommendation> = self
            .catalog
            .electives()
            .iter()
            .map(|course| self.scorer.score(profile, course))
            .collect();
        results.sort_by(|a, b| b.success_prob.total_cmp(&a.success_prob));
        results.truncate(MAX_RECOMMENDATIONS);
        results
    }

    /// Direct access for the passthrough endpoints that have no local tier.
    pub fn model(&self) -> &M {
        &self.model
    }
}
