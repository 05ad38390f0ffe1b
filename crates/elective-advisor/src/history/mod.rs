//! Bounded per-identity recommendation history with interchangeable
//! remote-store and local-file backends.

pub mod domain;
pub mod file;
pub mod postgres;
pub mod router;
pub mod store;

pub use domain::HistoryEntry;
pub use file::FileHistoryStore;
pub use postgres::PostgresHistoryStore;
pub use router::history_router;
pub use store::{AppendOutcome, HistoryStore, HISTORY_CAP};
