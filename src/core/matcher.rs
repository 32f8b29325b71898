use crate::core::{
    filters::{degree_match, location_outcome, study_mode_match, within_budget, LocationOutcome},
    scoring::{calculate_match_score, evaluate_requirements},
    subjects::SubjectResolver,
    text::{cosine_similarity, program_text, student_text, term_frequencies, TermFrequencies},
};
use crate::models::{
    CatalogEntry, MatchResult, MatchTuning, ProgramSnapshot, ScoreBreakdown, ScoringWeights,
    StudentPreferences, StudentProfile, UniversitySummary,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a ranking cannot be produced at all
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("insufficient profile data (missing marks: {missing_marks}, missing preferences: {missing_preferences})")]
    InsufficientProfile {
        missing_marks: bool,
        missing_preferences: bool,
    },
}

/// How many programs each filter removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionCounts {
    #[serde(rename = "overBudget")]
    pub over_budget: usize,
    #[serde(rename = "outOfProvince")]
    pub out_of_province: usize,
    pub defective: usize,
}

/// Result of the matching process
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub total_programs: usize,
    pub excluded: ExclusionCounts,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Budget pre-filter over the whole catalog
/// 2. Location hard filter
/// 3. Requirement, text, degree, study mode and surplus scoring
/// 4. Stable ranking by score
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    tuning: MatchTuning,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, tuning: MatchTuning) -> Self {
        Self { weights, tuning }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), MatchTuning::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn tuning(&self) -> &MatchTuning {
        &self.tuning
    }

    /// Score every program in `catalog` for `profile`, best first
    ///
    /// Programs with equal scores keep their catalog order. Missing marks or
    /// preferences are reported as [`MatchError::InsufficientProfile`].
    pub fn compute_matches(
        &self,
        profile: &StudentProfile,
        catalog: &[CatalogEntry],
    ) -> Result<MatchOutcome, MatchError> {
        let preferences = match (&profile.preferences, profile.marks.is_empty()) {
            (Some(preferences), false) => preferences,
            (preferences, missing_marks) => {
                return Err(MatchError::InsufficientProfile {
                    missing_marks,
                    missing_preferences: preferences.is_none(),
                });
            }
        };

        let mut excluded = ExclusionCounts::default();

        // Stage 1: budget pre-pass
        let eligible: Vec<&CatalogEntry> = match preferences.budget() {
            Some(max_fee) => catalog
                .iter()
                .filter(|entry| {
                    let keep = within_budget(&entry.program, max_fee);
                    if !keep {
                        excluded.over_budget += 1;
                    }
                    keep
                })
                .collect(),
            None => catalog.iter().collect(),
        };

        let resolver = SubjectResolver::new(&profile.marks, self.tuning.token_overlap_threshold);
        let student_vector = term_frequencies(&student_text(preferences));

        let mut matches = Vec::with_capacity(eligible.len());
        for entry in eligible {
            // Stage 2: location
            let location = location_outcome(entry, preferences, self.tuning.relocation_penalty);
            if location == LocationOutcome::Excluded {
                excluded.out_of_province += 1;
                continue;
            }

            // Stage 3: scoring
            match self.score_program(entry, preferences, &resolver, &student_vector, location) {
                Some(result) => matches.push(result),
                None => excluded.defective += 1,
            }
        }

        // Stage 4: stable sort keeps catalog order on ties
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        tracing::debug!(
            "Ranked {} of {} programs (over budget: {}, out of province: {}, defective: {})",
            matches.len(),
            catalog.len(),
            excluded.over_budget,
            excluded.out_of_province,
            excluded.defective
        );

        Ok(MatchOutcome {
            matches,
            total_programs: catalog.len(),
            excluded,
        })
    }

    fn score_program(
        &self,
        entry: &CatalogEntry,
        preferences: &StudentPreferences,
        resolver: &SubjectResolver<'_>,
        student_vector: &TermFrequencies,
        location: LocationOutcome,
    ) -> Option<MatchResult> {
        let program = &entry.program;

        let evaluation = match evaluate_requirements(&entry.requirements, resolver) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                tracing::warn!(
                    "Skipping program {} ({}): {}",
                    program.program_id,
                    program.program_name,
                    e
                );
                return None;
            }
        };

        if !entry.requirements.is_empty() && evaluation.resolved_count == 0 {
            tracing::debug!(
                program = %program.program_name,
                required = ?entry.requirements.iter().map(|r| r.required_subject.as_str()).collect::<Vec<_>>(),
                student = ?resolver.subjects().collect::<Vec<_>>(),
                "Program has requirements but no matching student marks"
            );
        }

        let text_similarity =
            cosine_similarity(student_vector, &term_frequencies(&program_text(program)));

        let breakdown = ScoreBreakdown {
            requirement_ratio: evaluation.requirement_ratio,
            text_similarity,
            degree_match: degree_match(program, preferences),
            study_mode_match: study_mode_match(program, preferences),
            surplus_score: evaluation.surplus_score,
            location_penalty: location.penalty(),
        };

        let match_score = calculate_match_score(&breakdown, &self.weights);

        Some(MatchResult {
            program: ProgramSnapshot {
                program_id: program.program_id,
                program_name: program.program_name.clone(),
                description: program.description.clone(),
                degree_type: program.degree_type.clone(),
                duration_years: program.duration_years,
                location: program.location.clone(),
                study_mode: program.study_mode.clone(),
                fees: program.fees.clone(),
                requirements: evaluation.statuses,
            },
            university: UniversitySummary {
                name: entry.university.name.clone(),
                province_state: entry.university.province_state.clone(),
            },
            match_score,
            requirement_ratio: breakdown.requirement_ratio,
            text_similarity: breakdown.text_similarity,
            breakdown,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank `catalog` for `profile` with the default weights and tuning
pub fn compute_matches(
    profile: &StudentProfile,
    catalog: &[CatalogEntry],
) -> Result<Vec<MatchResult>, MatchError> {
    Matcher::default()
        .compute_matches(profile, catalog)
        .map(|outcome| outcome.matches)
}
