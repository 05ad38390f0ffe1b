//! Static elective catalog loaded from the syllabus data source.

pub mod topics;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One elective course as declared by the syllabus data source. Immutable
/// once loaded; the loader is the sole owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Course group eligible for recommendation.
const ELECTIVES_GROUP: &str = "Electives";

#[derive(Debug, Deserialize)]
struct Syllabus {
    #[serde(default)]
    semesters: BTreeMap<String, BTreeMap<String, Vec<Course>>>,
}

/// Loads the elective catalog once and shares the result for the lifetime of
/// the process. The syllabus is static configuration, so there is no TTL and
/// no invalidation; a missing or malformed file degrades to an empty catalog
/// rather than an error.
#[derive(Debug)]
pub struct CatalogLoader {
    path: PathBuf,
    cache: OnceLock<Vec<Course>>,
}

impl CatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceLock::new(),
        }
    }

    /// Every semester's electives flattened into one sequence.
    pub fn electives(&self) -> &[Course] {
        self.cache
            .get_or_init(|| match load_syllabus(&self.path) {
                Ok(courses) => courses,
                Err(err) => {
                    warn!(
                        path = %self.path.display(),
                        error = %err,
                        "elective catalog unavailable, continuing with empty list"
                    );
                    Vec::new()
                }
            })
            .as_slice()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read syllabus file: {0}")]
    Read(#[from] std::io::Error),
    #[error("syllabus file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

fn load_syllabus(path: &Path) -> Result<Vec<Course>, CatalogError> {
    let raw = fs::read_to_string(path)?;
    let syllabus: Syllabus = serde_json::from_str(&raw)?;

    let mut electives = Vec::new();
    for mut groups in syllabus.semesters.into_values() {
        if let Some(courses) = groups.remove(ELECTIVES_GROUP) {
            electives.extend(courses);
        }
    }
    Ok(electives)
}
