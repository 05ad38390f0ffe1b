//! Resilient elective recommendation core.
//!
//! The pipeline keeps answering even when the remote model service is down:
//! a remote scoring tier falls back to a local heuristic scorer, and an empty
//! catalog degrades to an empty (still well-formed) recommendation set. The
//! same availability posture applies to identity resolution and history
//! persistence.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod recommend;
pub mod telemetry;
