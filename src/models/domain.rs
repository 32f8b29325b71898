use serde::{Deserialize, Deserializer, Serialize};

/// A single self-reported mark, keyed by the subject name the student typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicMark {
    #[serde(rename = "subjectName", alias = "subject_name", alias = "subject")]
    pub subject_name: String,
    #[serde(rename = "gradeOrPercentage", alias = "grade_or_percentage", alias = "percentage")]
    pub grade_or_percentage: f64,
    #[serde(rename = "gradeLevel", alias = "grade_level", default)]
    pub grade_level: Option<String>,
}

impl AcademicMark {
    pub fn new(subject_name: impl Into<String>, grade_or_percentage: f64) -> Self {
        Self {
            subject_name: subject_name.into(),
            grade_or_percentage,
            grade_level: None,
        }
    }
}

/// Student study preferences
///
/// Every field is optional on the wire; missing lists are empty, missing
/// flags are `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentPreferences {
    #[serde(rename = "location", alias = "preferred_location", alias = "preferredLocation", default)]
    pub location: Option<String>,
    #[serde(rename = "preferredDegrees", alias = "preferred_degrees", default)]
    pub preferred_degrees: Vec<String>,
    #[serde(rename = "maxTuitionFee", alias = "max_tuition_fee", default)]
    pub max_tuition_fee: Option<f64>,
    #[serde(rename = "studyMode", alias = "study_mode", default)]
    pub study_mode: Option<String>,
    #[serde(default, deserialize_with = "deserialize_yes_no")]
    pub relocate: bool,
    #[serde(rename = "focusArea", alias = "focus_area", default)]
    pub focus_area: Option<String>,
    #[serde(rename = "careerInterests", alias = "career_interests", default)]
    pub career_interests: Vec<String>,
    #[serde(rename = "financialAid", alias = "financial_aid", alias = "nsfas", default, deserialize_with = "deserialize_yes_no")]
    pub financial_aid: bool,
    #[serde(rename = "needSupport", alias = "need_support", default, deserialize_with = "deserialize_yes_no")]
    pub need_support: bool,
    #[serde(rename = "supportDetails", alias = "support_details", default)]
    pub support_details: Option<String>,
}

impl StudentPreferences {
    /// Preferred province: first comma-separated part of the location, case-folded.
    pub fn preferred_province(&self) -> Option<String> {
        let raw = self.location.as_deref()?;
        let province = raw.split(',').next().unwrap_or("").trim().to_lowercase();
        if province.is_empty() {
            None
        } else {
            Some(province)
        }
    }

    /// Budget cap, ignoring non-positive or non-finite values
    pub fn budget(&self) -> Option<f64> {
        self.max_tuition_fee.filter(|fee| fee.is_finite() && *fee > 0.0)
    }

    /// Study mode trimmed and case-folded, `None` when blank
    pub fn normalized_study_mode(&self) -> Option<String> {
        self.study_mode
            .as_deref()
            .map(|mode| mode.trim().to_lowercase())
            .filter(|mode| !mode.is_empty())
    }
}

/// Accepts either a JSON boolean or the legacy "yes"/"no" strings
fn deserialize_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(text)) => matches!(
            text.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        ),
        None => false,
    })
}

/// Everything the matcher reads about one student
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub marks: Vec<AcademicMark>,
    #[serde(default)]
    pub preferences: Option<StudentPreferences>,
}

/// Institution owning one or more programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    #[serde(rename = "universityId", default)]
    pub university_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "provinceState", alias = "province_state", alias = "province")]
    pub province_state: String,
}

/// A single subject/grade threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequirement {
    #[serde(rename = "requiredSubject", alias = "required_subject", alias = "subject")]
    pub required_subject: String,
    #[serde(rename = "minGradePercentage", alias = "min_grade_percentage")]
    pub min_grade_percentage: f64,
    #[serde(rename = "isPrerequisite", alias = "is_prerequisite", default = "default_true")]
    pub is_prerequisite: bool,
}

fn default_true() -> bool { true }

/// Catalog program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(rename = "programId")]
    pub program_id: i64,
    #[serde(rename = "programName")]
    pub program_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "degreeType", default)]
    pub degree_type: Option<String>,
    #[serde(rename = "durationYears", default)]
    pub duration_years: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "studyMode", default)]
    pub study_mode: Option<String>,
    #[serde(default)]
    pub fees: Option<String>,
}

/// One program together with its requirements and owning university
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub program: Program,
    #[serde(default)]
    pub requirements: Vec<ProgramRequirement>,
    pub university: University,
}

/// Requirement annotated with the student's resolved mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementStatus {
    #[serde(rename = "requiredSubject")]
    pub required_subject: String,
    #[serde(rename = "minGradePercentage")]
    pub min_grade_percentage: f64,
    #[serde(rename = "isPrerequisite")]
    pub is_prerequisite: bool,
    /// Display value: the resolved mark, or 0 when nothing matched
    #[serde(rename = "studentGrade")]
    pub student_grade: f64,
    #[serde(rename = "resolvedGrade")]
    pub resolved_grade: Option<f64>,
    /// Student subject the requirement was resolved against
    #[serde(rename = "matchedSubject")]
    pub matched_subject: Option<String>,
    pub met: bool,
}

/// Program fields copied into a match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    #[serde(rename = "programId")]
    pub program_id: i64,
    #[serde(rename = "programName")]
    pub program_name: String,
    pub description: Option<String>,
    #[serde(rename = "degreeType")]
    pub degree_type: Option<String>,
    #[serde(rename = "durationYears")]
    pub duration_years: Option<i32>,
    pub location: Option<String>,
    #[serde(rename = "studyMode")]
    pub study_mode: Option<String>,
    pub fees: Option<String>,
    pub requirements: Vec<RequirementStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversitySummary {
    pub name: String,
    #[serde(rename = "provinceState")]
    pub province_state: String,
}

/// Individual signals behind a match score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "requirementRatio")]
    pub requirement_ratio: f64,
    #[serde(rename = "textSimilarity")]
    pub text_similarity: f64,
    #[serde(rename = "degreeMatch")]
    pub degree_match: f64,
    #[serde(rename = "studyModeMatch")]
    pub study_mode_match: f64,
    #[serde(rename = "surplusScore")]
    pub surplus_score: f64,
    #[serde(rename = "locationPenalty")]
    pub location_penalty: f64,
}

/// Scored program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub program: ProgramSnapshot,
    pub university: UniversitySummary,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "requirementRatio")]
    pub requirement_ratio: f64,
    #[serde(rename = "textSimilarity")]
    pub text_similarity: f64,
    pub breakdown: ScoreBreakdown,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub requirements: f64,
    pub text: f64,
    pub degree: f64,
    pub study_mode: f64,
    pub surplus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            requirements: 0.45,
            text: 0.30,
            degree: 0.10,
            study_mode: 0.10,
            surplus: 0.05,
        }
    }
}

/// Thresholds that are not weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTuning {
    /// Minimum token overlap for the last-resort subject resolution step
    pub token_overlap_threshold: f64,
    /// Subtracted from the composite when the student relocates out of province
    pub relocation_penalty: f64,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            token_overlap_threshold: 0.4,
            relocation_penalty: 0.05,
        }
    }
}
