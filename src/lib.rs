//! Unimatch - program matching service for the university matchmaking site
//!
//! Ranks a catalog of academic programs against a student's marks and
//! preferences. The ranking itself lives in [`core`] and is pure; the
//! remaining modules wrap it in an HTTP service backed by PostgreSQL.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{compute_matches, resolve_grade, text_similarity, MatchError, Matcher};
pub use models::{
    CatalogEntry, MatchResult, MatchTuning, ScoringWeights, StudentPreferences, StudentProfile,
};
