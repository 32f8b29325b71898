// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod subjects;
pub mod text;

pub use filters::{
    degree_match, location_outcome, parse_fee, study_mode_match, within_budget, LocationOutcome,
};
pub use matcher::{compute_matches, ExclusionCounts, MatchError, MatchOutcome, Matcher};
pub use scoring::{
    calculate_match_score, evaluate_requirements, RequirementEvaluation, ScoringError,
};
pub use subjects::{
    canonical_subject, normalize_subject, resolve_grade, ResolutionStrategy, SubjectResolver,
};
pub use text::{
    cosine_similarity, program_text, student_text, term_frequencies, text_similarity, tokenize,
};
