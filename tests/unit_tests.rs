// Unit tests for Unimatch

use unimatch::core::{
    filters::{degree_match, parse_fee, study_mode_match, within_budget},
    scoring::{calculate_match_score, evaluate_requirements, surplus},
    subjects::{canonical_subject, resolve_grade, ResolutionStrategy, SubjectResolver},
    text::{program_text, student_text, text_similarity, tokenize},
};
use unimatch::models::{
    AcademicMark, Program, ProgramRequirement, ScoreBreakdown, ScoringWeights, StudentPreferences,
};

fn marks(entries: &[(&str, f64)]) -> Vec<AcademicMark> {
    entries
        .iter()
        .map(|(subject, grade)| AcademicMark::new(*subject, *grade))
        .collect()
}

fn create_program(degree_type: &str, study_mode: &str, fees: Option<&str>) -> Program {
    Program {
        program_id: 1,
        program_name: "BSc Computer Science".to_string(),
        description: Some("Algorithms, software and data".to_string()),
        degree_type: Some(degree_type.to_string()),
        duration_years: Some(3),
        location: Some("Stellenbosch".to_string()),
        study_mode: Some(study_mode.to_string()),
        fees: fees.map(str::to_string),
    }
}

#[test]
fn test_resolve_exact_match() {
    let student = marks(&[("English", 64.0), ("Mathematics", 81.0)]);
    assert_eq!(resolve_grade("Mathematics", &student), Some(81.0));
}

#[test]
fn test_resolve_normalized_match() {
    let student = marks(&[("  physical-SCIENCE ", 58.0)]);
    let resolver = SubjectResolver::with_default_threshold(&student);

    let resolved = resolver.resolve("Physical Science").unwrap();
    assert_eq!(resolved.grade, 58.0);
    assert_eq!(resolved.strategy, ResolutionStrategy::Normalized);
}

#[test]
fn test_resolve_abbreviation() {
    let student = marks(&[("Maths", 75.0)]);
    assert_eq!(resolve_grade("Mathematics", &student), Some(75.0));
}

#[test]
fn test_resolve_substring_match() {
    let student = marks(&[("English Home Language Paper 1", 66.0)]);
    let resolver = SubjectResolver::with_default_threshold(&student);

    let resolved = resolver.resolve("English").unwrap();
    assert_eq!(resolved.strategy, ResolutionStrategy::Substring);
    assert_eq!(resolved.subject, "English Home Language Paper 1");
}

#[test]
fn test_resolve_token_overlap_match() {
    let student = marks(&[("Business Economics", 70.0)]);
    let resolver = SubjectResolver::with_default_threshold(&student);

    // one of two tokens shared: 0.5 >= 0.4
    let resolved = resolver.resolve("Economics Studies").unwrap();
    assert_eq!(resolved.strategy, ResolutionStrategy::TokenOverlap);
    assert_eq!(resolved.grade, 70.0);
}

#[test]
fn test_resolve_disjoint_subjects() {
    let student = marks(&[("Life Sciences", 60.0)]);
    assert_eq!(resolve_grade("Physical Science", &student), None);
}

#[test]
fn test_literacy_is_not_mathematics() {
    let student = marks(&[("Mathematical Literacy", 90.0)]);
    assert_eq!(resolve_grade("Mathematics", &student), None);

    let student = marks(&[("Maths Lit", 90.0)]);
    assert_eq!(canonical_subject("Maths Lit"), "mathematical literacy");
    assert_eq!(resolve_grade("Mathematics", &student), None);
}

#[test]
fn test_resolve_empty_inputs() {
    assert_eq!(resolve_grade("Mathematics", &[]), None);
    assert_eq!(resolve_grade("", &marks(&[("Mathematics", 50.0)])), None);
    assert_eq!(resolve_grade("Mathematics", &marks(&[("!!!", 50.0)])), None);
}

#[test]
fn test_tokenize_drops_short_tokens() {
    assert_eq!(tokenize("I want a BSc"), vec!["want", "bsc"]);
}

#[test]
fn test_text_similarity_bounds() {
    assert_eq!(text_similarity("", "anything at all"), 0.0);
    assert!((text_similarity("data science", "Science DATA") - 1.0).abs() < 1e-9);

    let partial = text_similarity("data science", "rocket science");
    assert!(partial > 0.0 && partial < 1.0);
}

#[test]
fn test_student_and_program_text() {
    let prefs = StudentPreferences {
        focus_area: Some("Engineering".to_string()),
        preferred_degrees: vec!["BEng".to_string()],
        career_interests: vec!["Civil engineer".to_string()],
        ..Default::default()
    };
    assert_eq!(student_text(&prefs), "Engineering BEng Civil engineer");

    let program = create_program("BSc", "Full-time", None);
    assert_eq!(
        program_text(&program),
        "BSc Computer Science Algorithms, software and data BSc Stellenbosch"
    );
}

#[test]
fn test_parse_fee_variants() {
    assert_eq!(parse_fee("R 25,000"), Some(25000.0));
    assert_eq!(parse_fee("ZAR45 500.50"), Some(45500.5));
    assert_eq!(parse_fee("$1,200"), Some(1200.0));
    assert_eq!(parse_fee("Contact faculty"), None);
    assert_eq!(parse_fee(""), None);
}

#[test]
fn test_budget_filter_boundaries() {
    assert!(within_budget(&create_program("BSc", "Full-time", Some("R 15 000")), 20000.0));
    assert!(within_budget(&create_program("BSc", "Full-time", Some("20000")), 20000.0));
    assert!(!within_budget(&create_program("BSc", "Full-time", Some("R 25,000")), 20000.0));
    assert!(!within_budget(&create_program("BSc", "Full-time", Some("TBC")), 20000.0));
    assert!(!within_budget(&create_program("BSc", "Full-time", None), 20000.0));
}

#[test]
fn test_degree_and_study_mode_signals() {
    let prefs = StudentPreferences {
        preferred_degrees: vec!["bsc".to_string(), "BCom".to_string()],
        study_mode: Some("Part-time".to_string()),
        ..Default::default()
    };

    assert_eq!(degree_match(&create_program("BSc", "Full-time", None), &prefs), 1.0);
    assert_eq!(degree_match(&create_program("BA", "Full-time", None), &prefs), 0.0);
    assert_eq!(study_mode_match(&create_program("BSc", "Full-time or Part-Time", None), &prefs), 1.0);
    assert_eq!(study_mode_match(&create_program("BSc", "Full-time", None), &prefs), 0.0);
    assert_eq!(
        study_mode_match(&create_program("BSc", "Full-time", None), &StudentPreferences::default()),
        0.0
    );
}

#[test]
fn test_requirement_evaluation() {
    let student = marks(&[("Maths", 70.0), ("English", 45.0)]);
    let resolver = SubjectResolver::with_default_threshold(&student);
    let requirements = vec![
        ProgramRequirement {
            required_subject: "Mathematics".to_string(),
            min_grade_percentage: 60.0,
            is_prerequisite: true,
        },
        ProgramRequirement {
            required_subject: "English".to_string(),
            min_grade_percentage: 50.0,
            is_prerequisite: true,
        },
        ProgramRequirement {
            required_subject: "Accounting".to_string(),
            min_grade_percentage: 0.0,
            is_prerequisite: false,
        },
    ];

    let evaluation = evaluate_requirements(&requirements, &resolver).unwrap();

    // Unresolved Accounting still meets a zero threshold
    assert!((evaluation.requirement_ratio - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(evaluation.resolved_count, 2);
    assert_eq!(evaluation.statuses[2].resolved_grade, None);
    assert_eq!(evaluation.statuses[2].student_grade, 0.0);
    assert!(evaluation.statuses[2].met);
    assert_eq!(evaluation.statuses[0].matched_subject.as_deref(), Some("Maths"));

    let expected_surplus = (surplus(70.0, 60.0) + surplus(45.0, 50.0)) / 2.0;
    assert!((evaluation.surplus_score - expected_surplus).abs() < 1e-9);
}

#[test]
fn test_surplus_floor() {
    assert_eq!(surplus(40.0, 50.0), 0.0);
    assert_eq!(surplus(50.0, 0.0), 50.0);
    assert!((surplus(75.0, 50.0) - 0.5).abs() < 1e-9);
}

#[test]
fn test_calculate_match_score() {
    let weights = ScoringWeights::default();

    let perfect = ScoreBreakdown {
        requirement_ratio: 1.0,
        text_similarity: 1.0,
        degree_match: 1.0,
        study_mode_match: 1.0,
        surplus_score: 1.0,
        location_penalty: 0.0,
    };
    assert_eq!(calculate_match_score(&perfect, &weights), 100);

    let penalized = ScoreBreakdown {
        location_penalty: -0.05,
        ..ScoreBreakdown::default()
    };
    assert_eq!(calculate_match_score(&penalized, &weights), 0);

    let requirements_only = ScoreBreakdown {
        requirement_ratio: 1.0,
        ..ScoreBreakdown::default()
    };
    assert_eq!(calculate_match_score(&requirements_only, &weights), 45);
}
