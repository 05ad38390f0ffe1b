use crate::infra::OfflineGateway;
use clap::Args;
use elective_advisor::catalog::CatalogLoader;
use elective_advisor::error::AppError;
use elective_advisor::recommend::{
    HeuristicScorer, RecommendationService, StudentProfile, UniformJitter,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Syllabus JSON feeding the catalog
    #[arg(long, default_value = "data/syllabus.json")]
    pub(crate) syllabus: PathBuf,
    /// Comma-separated interest tags for the sample profile
    #[arg(long, default_value = "ML,Data")]
    pub(crate) interests: String,
    /// Current semester of the sample profile
    #[arg(long, default_value_t = 4)]
    pub(crate) semester: u32,
    /// Comma-separated GPA history, oldest first
    #[arg(long, default_value = "7.2,7.8")]
    pub(crate) gpas: String,
}

/// Walk the full recommendation pipeline without a model service: the
/// gateway reports unavailable and the heuristic tier answers.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let interests: Vec<String> = args
        .interests
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    let previous_gpas: Vec<f64> = args
        .gpas
        .split(',')
        .filter_map(|gpa| gpa.trim().parse().ok())
        .collect();

    let profile = StudentProfile {
        interests,
        current_semester: args.semester,
        previous_gpas,
        ..StudentProfile::default()
    };

    let catalog = CatalogLoader::new(args.syllabus.clone());
    let service = RecommendationService::new(
        catalog,
        HeuristicScorer::new(UniformJitter),
        OfflineGateway,
    );

    let recommendations = service.recommend(&profile).await;
    if recommendations.is_empty() {
        println!(
            "No electives available at {} - nothing to recommend.",
            args.syllabus.display()
        );
        return Ok(());
    }

    println!(
        "Elective recommendations for interests [{}], semester {}:",
        profile.interests.join(", "),
        profile.current_semester
    );
    for (rank, rec) in recommendations.iter().enumerate() {
        let risk = rec
            .risk
            .map(|band| format!("{band:?}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>2}. {:<8} {:<40} {:>5.1}%  risk: {:<6}  {}",
            rank + 1,
            rec.code,
            rec.name,
            rec.success_prob * 100.0,
            risk,
            rec.reason
        );
    }

    Ok(())
}
