use crate::core::subjects::SubjectResolver;
use crate::models::{ProgramRequirement, RequirementStatus, ScoreBreakdown, ScoringWeights};
use thiserror::Error;

/// Data defects that disqualify a single program
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("requirement '{subject}' has a non-numeric threshold ({value})")]
    InvalidThreshold { subject: String, value: f64 },
}

/// Requirement pass/fail annotations plus the two requirement-derived signals
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementEvaluation {
    pub statuses: Vec<RequirementStatus>,
    pub requirement_ratio: f64,
    pub surplus_score: f64,
    pub resolved_count: usize,
}

/// Resolve every requirement against the student's marks
///
/// Unresolved subjects count as a grade of 0 for the threshold check but are
/// reported with `resolved_grade: None` and are left out of the surplus.
pub fn evaluate_requirements(
    requirements: &[ProgramRequirement],
    resolver: &SubjectResolver<'_>,
) -> Result<RequirementEvaluation, ScoringError> {
    let mut statuses = Vec::with_capacity(requirements.len());
    let mut met_count = 0usize;
    let mut surplus_total = 0.0;
    let mut resolved_count = 0usize;

    for requirement in requirements {
        let min_grade = requirement.min_grade_percentage;
        if !min_grade.is_finite() {
            return Err(ScoringError::InvalidThreshold {
                subject: requirement.required_subject.clone(),
                value: min_grade,
            });
        }

        let resolved = resolver.resolve(&requirement.required_subject);
        let student_grade = resolved.as_ref().map_or(0.0, |r| r.grade);
        let met = student_grade >= min_grade;

        if met {
            met_count += 1;
        }
        if let Some(r) = &resolved {
            surplus_total += surplus(r.grade, min_grade);
            resolved_count += 1;
        }

        statuses.push(RequirementStatus {
            required_subject: requirement.required_subject.clone(),
            min_grade_percentage: min_grade,
            is_prerequisite: requirement.is_prerequisite,
            student_grade,
            resolved_grade: resolved.as_ref().map(|r| r.grade),
            matched_subject: resolved.map(|r| r.subject.to_string()),
            met,
        });
    }

    let requirement_ratio = if requirements.is_empty() {
        1.0
    } else {
        met_count as f64 / requirements.len() as f64
    };

    let surplus_score = if resolved_count > 0 {
        surplus_total / resolved_count as f64
    } else {
        0.0
    };

    Ok(RequirementEvaluation {
        statuses,
        requirement_ratio,
        surplus_score,
        resolved_count,
    })
}

/// Relative amount by which `grade` exceeds `min_grade`, never negative
#[inline]
pub fn surplus(grade: f64, min_grade: f64) -> f64 {
    ((grade - min_grade) / min_grade.max(1.0)).max(0.0)
}

/// Weighted composite in `0..=100`
///
/// score = (
///     requirement_ratio * 0.45 +
///     text_similarity   * 0.30 +
///     degree_match      * 0.10 +
///     study_mode_match  * 0.10 +
///     surplus_score     * 0.05 +
///     location_penalty
/// ) clamped to [0, 1]
///
/// Halves round to even, so 32.5 scores 32.
pub fn calculate_match_score(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> u8 {
    let total = breakdown.requirement_ratio * weights.requirements
        + breakdown.text_similarity * weights.text
        + breakdown.degree_match * weights.degree
        + breakdown.study_mode_match * weights.study_mode
        + breakdown.surplus_score * weights.surplus
        + breakdown.location_penalty;

    if !total.is_finite() {
        return 0;
    }

    (total.clamp(0.0, 1.0) * 100.0).round_ties_even() as u8
}
