// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AcademicMark, CatalogEntry, MatchResult, MatchTuning, Program, ProgramRequirement,
    ProgramSnapshot, RequirementStatus, ScoreBreakdown, ScoringWeights, StudentPreferences,
    StudentProfile, University, UniversitySummary,
};
pub use requests::{FindMatchesRequest, LikeCourseRequest, MarkInput, SaveStudentDataRequest};
pub use responses::{
    CatalogResponse, DebugMatchesResponse, ErrorResponse, FindMatchesResponse, HealthResponse,
    LikeCourseResponse, LikedCoursesResponse, MessageResponse, StudentDataResponse,
};
