use crate::auth::SessionResolver;
use crate::recommend::RecommendationService;

/// Shared state behind the API routers: the tiered recommendation service,
/// the session resolver, and the configured history backend.
pub struct AppContext<M, H> {
    pub recommendations: RecommendationService<M>,
    pub sessions: SessionResolver,
    pub history: H,
}

impl<M, H> AppContext<M, H> {
    pub fn new(
        recommendations: RecommendationService<M>,
        sessions: SessionResolver,
        history: H,
    ) -> Self {
        Self {
            recommendations,
            sessions,
            history,
        }
    }
}
