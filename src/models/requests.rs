use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::StudentPreferences;

/// Request to rank the catalog for a student
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: i64,
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// One mark as submitted by the student form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkInput {
    #[validate(length(min = 1, max = 100))]
    #[serde(alias = "subject_name", rename = "subjectName")]
    pub subject_name: String,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(alias = "grade_or_percentage", rename = "gradeOrPercentage")]
    pub grade_or_percentage: f64,
    #[serde(alias = "grade_level", rename = "gradeLevel", default)]
    pub grade_level: Option<String>,
}

/// Request to save a student's marks and preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveStudentDataRequest {
    #[validate(nested)]
    #[serde(alias = "academic_marks", rename = "academicMarks", default)]
    pub academic_marks: Vec<MarkInput>,
    #[serde(default)]
    pub preferences: Option<StudentPreferences>,
}

/// Request to like a course
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeCourseRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "program_id", alias = "courseId", alias = "course_id", rename = "programId")]
    pub program_id: i64,
}
