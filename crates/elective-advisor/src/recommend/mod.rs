//! The resilient recommendation pipeline: domain types, heuristic scoring,
//! the remote model gateway, and the tiered orchestration over them.

pub mod domain;
pub mod gateway;
pub mod router;
pub mod scorer;
pub mod service;

pub use domain::{
    AcademicLevel, ExplainBlock, LearningStyle, Recommendation, RecommendationSet, RiskLevel,
    StudentProfile,
};
pub use gateway::{
    CourseList, CourseRisk, DropoutRisks, GradeFeatures, GradePrediction, ModelGateway,
    ModelGatewayError, ModelServiceClient,
};
pub use router::recommendation_router;
pub use scorer::{FixedJitter, HeuristicScorer, JitterSource, UniformJitter};
pub use service::{RecommendationService, MAX_RECOMMENDATIONS};
