//! Local success-probability estimation used when the model service is
//! unreachable.

use rand::Rng;

use super::domain::{AcademicLevel, ExplainBlock, Recommendation, RiskLevel, StudentProfile};
use crate::catalog::{topics, Course};

/// Half-width of the symmetric jitter folded into every score.
const JITTER_SPAN: f64 = 0.05;
/// Probabilities are clamped away from certainty at both ends.
const MIN_PROBABILITY: f64 = 0.1;
const MAX_PROBABILITY: f64 = 0.95;
/// At most this many matched topics are named in the rationale text.
const NAMED_TOPICS: usize = 3;

/// Source of the tie-breaking jitter. Injected so tests and demos can pin a
/// value while production draws uniformly.
pub trait JitterSource: Send + Sync {
    /// A value within `[-0.05, 0.05]`.
    fn sample(&self) -> f64;
}

/// Production jitter drawing from the thread-local uniform generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformJitter;

impl JitterSource for UniformJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(-JITTER_SPAN..=JITTER_SPAN)
    }
}

/// Fixed jitter for deterministic scoring.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Scores a (profile, course) pair by blending interest overlap with the
/// most recent GPA, weighted toward performance.
pub struct HeuristicScorer {
    jitter: Box<dyn JitterSource>,
}

impl HeuristicScorer {
    pub fn new(jitter: impl JitterSource + 'static) -> Self {
        Self {
            jitter: Box::new(jitter),
        }
    }

    pub fn score(&self, profile: &StudentProfile, course: &Course) -> Recommendation {
        let topics = course_topics(course);
        let matching: Vec<String> = topics
            .iter()
            .filter(|topic| profile.interests.iter().any(|interest| interest == *topic))
            .cloned()
            .collect();
        let overlap = matching.len();

        let mut base = 0.4 + 0.1 * overlap as f64;
        if let Some(latest) = profile.latest_gpa() {
            base = 0.6 * base + 0.4 * (latest / 10.0);
        }
        let success_prob = (base + self.jitter.sample()).clamp(MIN_PROBABILITY, MAX_PROBABILITY);

        let avg_gpa = profile.average_gpa();
        let (reason, detailed_reason) = rationale(profile, &matching, avg_gpa);

        Recommendation {
            code: course.code.clone(),
            name: course.name.clone(),
            success_prob,
            risk: RiskLevel::for_probability(success_prob),
            reason,
            detailed_reason,
            explain: ExplainBlock {
                overlap,
                matching_topics: matching,
                current_semester: profile.current_semester,
                avg_gpa: avg_gpa.map(|gpa| (gpa * 100.0).round() / 100.0).unwrap_or(0.0),
                academic_level: AcademicLevel::for_semester(profile.current_semester),
            },
        }
    }
}

/// Declared topics unioned with tags derived from the course name.
fn course_topics(course: &Course) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for declared in &course.topics {
        if !topics.contains(declared) {
            topics.push(declared.clone());
        }
    }
    for tag in topics::classify(&course.name) {
        if !topics.iter().any(|existing| existing.as_str() == tag) {
            topics.push(tag.to_string());
        }
    }
    topics
}

fn rationale(
    profile: &StudentProfile,
    matching: &[String],
    avg_gpa: Option<f64>,
) -> (String, String) {
    if matching.is_empty() {
        return (
            "General fit based on profile".to_string(),
            "This course provides a solid foundation and fits well with your current academic progression."
                .to_string(),
        );
    }

    let named = matching
        .iter()
        .take(NAMED_TOPICS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let reason = format!("Matches your interests ({named})");

    let mut detailed = format!("This course strongly aligns with your interests in {named}. ");
    if let Some(avg) = avg_gpa {
        detailed.push_str(&format!(
            "Your academic performance (avg {avg:.1}/10 GPA) indicates good preparation for this course. "
        ));
    }
    detailed.push_str(&format!(
        "Taking this course in semester {} will build valuable skills for your career path.",
        profile.current_semester
    ));

    (reason, detailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, topics: &[&str]) -> Course {
        Course {
            code: "CSE590".to_string(),
            name: name.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn profile(interests: &[&str], gpas: &[f64], semester: u32) -> StudentProfile {
        StudentProfile {
            interests: interests.iter().map(|i| i.to_string()).collect(),
            current_semester: semester,
            previous_gpas: gpas.to_vec(),
            ..StudentProfile::default()
        }
    }

    #[test]
    fn overlap_drives_the_base_score() {
        // "Advanced Machine Learning" classifies as ML and AI; both match.
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let rec = scorer.score(
            &profile(&["ML", "AI"], &[], 1),
            &course("Advanced Machine Learning", &[]),
        );
        assert_eq!(rec.explain.overlap, 2);
        assert!((rec.success_prob - 0.6).abs() < 1e-9);
    }

    #[test]
    fn latest_gpa_blends_toward_performance() {
        // base 0.4, latest 8.0/10 -> 0.6*0.4 + 0.4*0.8 = 0.56
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let rec = scorer.score(&profile(&[], &[8.0], 1), &course("Professional Ethics", &[]));
        assert!((rec.success_prob - 0.56).abs() < 1e-9);
    }

    #[test]
    fn jitter_stays_within_the_documented_window() {
        for jitter in [-0.05, 0.05] {
            let scorer = HeuristicScorer::new(FixedJitter(jitter));
            let rec = scorer.score(&profile(&[], &[8.0], 1), &course("Professional Ethics", &[]));
            assert!(rec.success_prob >= 0.51 && rec.success_prob <= 0.61);
        }
    }

    #[test]
    fn probability_is_clamped_below_certainty() {
        let scorer = HeuristicScorer::new(FixedJitter(0.05));
        let rec = scorer.score(
            &profile(&["ML", "AI", "Data", "Web", "Cloud", "Security"], &[], 1),
            &course(
                "Machine Learning for Web Security in the Cloud",
                &["Data"],
            ),
        );
        assert!(rec.success_prob <= 0.95);
        assert!(rec.success_prob >= 0.1);
    }

    #[test]
    fn declared_and_derived_topics_are_unioned_without_duplicates() {
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let rec = scorer.score(
            &profile(&["ML"], &[], 1),
            // "ML" declared and also derived from the name; counted once.
            &course("Machine Learning", &["ML"]),
        );
        assert_eq!(rec.explain.overlap, 1);
    }

    #[test]
    fn rationale_names_at_most_three_topics() {
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let rec = scorer.score(
            &profile(&["ML", "AI", "Data", "Cloud"], &[], 4),
            &course("Machine Learning with Cloud Data", &[]),
        );
        assert!(rec.explain.overlap >= 4);
        let named = rec.reason.trim_start_matches("Matches your interests (");
        assert_eq!(named.trim_end_matches(')').split(", ").count(), 3);
    }

    #[test]
    fn generic_rationale_without_overlap() {
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let rec = scorer.score(&profile(&["NLP"], &[], 1), &course("Professional Ethics", &[]));
        assert_eq!(rec.reason, "General fit based on profile");
        assert!(rec.explain.matching_topics.is_empty());
    }

    #[test]
    fn detailed_reason_mentions_average_gpa_and_semester() {
        let scorer = HeuristicScorer::new(FixedJitter(0.0));
        let rec = scorer.score(
            &profile(&["ML"], &[7.0, 8.0], 4),
            &course("Machine Learning", &[]),
        );
        assert!(rec.detailed_reason.contains("avg 7.5/10 GPA"));
        assert!(rec.detailed_reason.contains("semester 4"));
        assert!((rec.explain.avg_gpa - 7.5).abs() < 1e-9);
    }
}
