//! Keyword-driven topic tagging for course names.

/// Name fragments mapped to the topic they imply. Machine-learning courses
/// are tagged as AI as well, since the interest taxonomy treats ML as a
/// branch of AI.
const KEYWORD_TOPICS: &[(&str, &str)] = &[
    ("data", "Data"),
    ("machine", "ML"),
    ("learning", "ML"),
    ("machine learning", "AI"),
    ("ai", "AI"),
    ("intelligence", "AI"),
    ("web", "Web"),
    ("cloud", "Cloud"),
    ("security", "Security"),
    ("network", "Networks"),
    ("image", "CV"),
    ("vision", "CV"),
    ("natural language", "NLP"),
    ("nlp", "NLP"),
    ("database", "Databases"),
    ("algorithm", "Algorithms"),
];

/// Derive topic tags from a course name by case-insensitive substring match.
/// Pure and deterministic; duplicate keywords collapsing to the same topic
/// yield a single tag.
pub fn classify(course_name: &str) -> Vec<&'static str> {
    let lowered = course_name.to_lowercase();
    let mut tags: Vec<&'static str> = Vec::new();
    for &(keyword, topic) in KEYWORD_TOPICS {
        if lowered.contains(keyword) && !tags.contains(&topic) {
            tags.push(topic);
        }
    }
    tags
}
