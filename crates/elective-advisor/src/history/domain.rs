use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommend::{Recommendation, StudentProfile};

/// One recorded recommendation round for an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Epoch milliseconds on the wire and in the stored layout.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ts: DateTime<Utc>,
    pub input: StudentProfile,
    pub results: Vec<Recommendation>,
}
