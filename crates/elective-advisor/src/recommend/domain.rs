use serde::{Deserialize, Serialize};

/// How a student reports they learn best.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    #[serde(rename = "Reading/Writing")]
    ReadingWriting,
    Kinesthetic,
}

/// Academic profile submitted with every recommendation request. The wire
/// shape is camelCase; `currentYear` and `gpas` are accepted as aliases for
/// compatibility with older clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_goal: Option<String>,
    pub learning_style: LearningStyle,
    #[serde(alias = "currentYear")]
    pub current_semester: u32,
    #[serde(alias = "gpas")]
    pub previous_gpas: Vec<f64>,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            interests: Vec::new(),
            career_goal: None,
            learning_style: LearningStyle::default(),
            current_semester: 1,
            previous_gpas: Vec::new(),
        }
    }
}

impl StudentProfile {
    /// Most recent GPA; the history is ordered oldest-first.
    pub fn latest_gpa(&self) -> Option<f64> {
        self.previous_gpas.last().copied()
    }

    pub fn average_gpa(&self) -> Option<f64> {
        if self.previous_gpas.is_empty() {
            return None;
        }
        Some(self.previous_gpas.iter().sum::<f64>() / self.previous_gpas.len() as f64)
    }
}

/// Elevated-risk bands. A comfortable success probability carries no band,
/// which serializes as `null` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Medium,
    High,
}

impl RiskLevel {
    /// `High` below 0.5, `Medium` below 0.75, nothing at or above.
    pub fn for_probability(success_prob: f64) -> Option<Self> {
        if success_prob < 0.5 {
            Some(Self::High)
        } else if success_prob < 0.75 {
            Some(Self::Medium)
        } else {
            None
        }
    }
}

/// Coarse study-stage tag derived from the current semester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl AcademicLevel {
    pub fn for_semester(semester: u32) -> Self {
        match semester {
            0..=2 => Self::Beginner,
            3..=5 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }
}

/// Structured rationale attached to every recommendation so the caller can
/// show *why*, not just a number. Reproducible from the same inputs apart
/// from the jitter folded into `success_prob`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainBlock {
    #[serde(alias = "interest_overlap")]
    pub overlap: usize,
    pub matching_topics: Vec<String>,
    pub current_semester: u32,
    pub avg_gpa: f64,
    pub academic_level: AcademicLevel,
}

/// One scored elective. The shape is identical whichever tier produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub code: String,
    pub name: String,
    pub success_prob: f64,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    pub reason: String,
    pub detailed_reason: String,
    #[serde(default)]
    pub explain: ExplainBlock,
}

/// Response envelope shared by the exposed endpoint and the remote model
/// service: descending by `success_prob`, at most eight entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
}
