use serde::{Deserialize, Serialize};
use crate::core::ExclusionCounts;
use crate::models::domain::{AcademicMark, CatalogEntry, MatchResult, StudentPreferences};

/// Response for the find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    #[serde(rename = "runId")]
    pub run_id: uuid::Uuid,
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalPrograms")]
    pub total_programs: usize,
    pub excluded: ExclusionCounts,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Matches together with the inputs that produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugMatchesResponse {
    pub matches: Vec<MatchResult>,
    pub preferences: Option<StudentPreferences>,
    pub marks: Vec<AcademicMark>,
}

/// Stored student data, preferences filled with defaults when absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDataResponse {
    #[serde(rename = "studentId")]
    pub student_id: i64,
    #[serde(rename = "academicMarks")]
    pub academic_marks: Vec<AcademicMark>,
    pub preferences: StudentPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub programs: Vec<CatalogEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedCoursesResponse {
    #[serde(rename = "studentId")]
    pub student_id: i64,
    #[serde(rename = "programIds")]
    pub program_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeCourseResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
