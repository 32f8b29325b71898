// Integration tests for Unimatch

use unimatch::core::{ExclusionCounts, MatchError, Matcher};
use unimatch::compute_matches;
use unimatch::models::{
    AcademicMark, CatalogEntry, Program, ProgramRequirement, StudentPreferences, StudentProfile,
    University,
};

fn create_test_entry(
    id: i64,
    name: &str,
    province: &str,
    fees: Option<&str>,
    requirements: &[(&str, f64)],
) -> CatalogEntry {
    CatalogEntry {
        program: Program {
            program_id: id,
            program_name: name.to_string(),
            description: Some("Computer Science".to_string()),
            degree_type: Some("BSc".to_string()),
            duration_years: Some(3),
            location: None,
            study_mode: Some("Full-time".to_string()),
            fees: fees.map(str::to_string),
        },
        requirements: requirements
            .iter()
            .map(|(subject, min)| ProgramRequirement {
                required_subject: subject.to_string(),
                min_grade_percentage: *min,
                is_prerequisite: true,
            })
            .collect(),
        university: University {
            university_id: Some(id),
            name: format!("University {}", id),
            city: None,
            province_state: province.to_string(),
        },
    }
}

fn create_test_preferences(relocate: bool, max_tuition_fee: Option<f64>) -> StudentPreferences {
    StudentPreferences {
        location: Some("western cape".to_string()),
        preferred_degrees: vec!["BSc".to_string()],
        max_tuition_fee,
        study_mode: Some("full-time".to_string()),
        relocate,
        focus_area: Some("Computer Science".to_string()),
        ..Default::default()
    }
}

fn create_test_profile(relocate: bool, max_tuition_fee: Option<f64>) -> StudentProfile {
    StudentProfile {
        marks: vec![
            AcademicMark::new("Mathematics", 70.0),
            AcademicMark::new("English", 60.0),
        ],
        preferences: Some(create_test_preferences(relocate, max_tuition_fee)),
    }
}

fn mixed_catalog() -> Vec<CatalogEntry> {
    vec![
        create_test_entry(1, "BSc Computer Science", "Western Cape", Some("R 40,000"), &[("Mathematics", 60.0)]),
        create_test_entry(2, "BSc Data Science", "Gauteng", Some("R 35,000"), &[("Mathematics", 75.0)]),
        create_test_entry(3, "BSc Physics", "western cape", None, &[("Physical Science", 60.0)]),
        create_test_entry(4, "BSc Statistics", "KwaZulu-Natal", Some("fees on request"), &[]),
        create_test_entry(5, "BSc Informatics", "Western Cape", Some("R 20 000"), &[("English", 50.0), ("Mathematics", 50.0)]),
    ]
}

#[test]
fn test_integration_scenario() {
    let catalog = vec![create_test_entry(
        1,
        "BSc Computer Science",
        "western cape",
        None,
        &[("Mathematics", 60.0), ("English", 50.0)],
    )];

    let results = compute_matches(&create_test_profile(false, None), &catalog).unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.requirement_ratio, 1.0);
    assert!(result.match_score > 80, "Expected a high score, got {}", result.match_score);
    assert!(result.program.requirements.iter().all(|r| r.met));
    assert_eq!(result.university.province_state, "western cape");
}

#[test]
fn test_integration_deterministic() {
    let profile = create_test_profile(true, None);
    let catalog = mixed_catalog();

    let first = compute_matches(&profile, &catalog).unwrap();
    let second = compute_matches(&profile, &catalog).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_integration_score_bounds() {
    let results = compute_matches(&create_test_profile(true, None), &mixed_catalog()).unwrap();

    assert_eq!(results.len(), 5);
    for result in &results {
        assert!(result.match_score <= 100);
        assert!((0.0..=1.0).contains(&result.text_similarity));
        assert!((0.0..=1.0).contains(&result.requirement_ratio));
    }
}

#[test]
fn test_integration_zero_requirements() {
    let results = compute_matches(&create_test_profile(true, None), &mixed_catalog()).unwrap();

    let statistics = results.iter().find(|r| r.program.program_id == 4).unwrap();
    assert_eq!(statistics.requirement_ratio, 1.0);
    assert!(statistics.program.requirements.is_empty());
}

#[test]
fn test_integration_hard_relocation_filter() {
    let outcome = Matcher::default()
        .compute_matches(&create_test_profile(false, None), &mixed_catalog())
        .unwrap();

    let ids: Vec<i64> = outcome.matches.iter().map(|m| m.program.program_id).collect();
    assert!(!ids.contains(&2));
    assert!(!ids.contains(&4));
    assert_eq!(outcome.excluded.out_of_province, 2);
}

#[test]
fn test_integration_budget_filter() {
    let catalog = vec![
        create_test_entry(1, "BSc Expensive", "western cape", Some("25000"), &[]),
        create_test_entry(2, "BSc Affordable", "western cape", Some("15000"), &[]),
        create_test_entry(3, "BSc Unknown", "western cape", Some("see website"), &[]),
    ];

    let outcome = Matcher::default()
        .compute_matches(&create_test_profile(false, Some(20000.0)), &catalog)
        .unwrap();

    let ids: Vec<i64> = outcome.matches.iter().map(|m| m.program.program_id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(
        outcome.excluded,
        ExclusionCounts { over_budget: 2, out_of_province: 0, defective: 0 }
    );

    // Without a cap the unparseable fee is harmless
    let results = compute_matches(&create_test_profile(false, None), &catalog).unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn test_integration_ranking_by_requirements() {
    let catalog = vec![
        create_test_entry(1, "BSc Computer Science", "western cape", None, &[("Accounting", 60.0)]),
        create_test_entry(2, "BSc Computer Science", "western cape", None, &[("English", 60.0)]),
    ];

    let results = compute_matches(&create_test_profile(false, None), &catalog).unwrap();

    assert_eq!(results[0].program.program_id, 2);
    assert_eq!(results[0].requirement_ratio, 1.0);
    assert_eq!(results[1].requirement_ratio, 0.0);
    assert!(results[0].match_score > results[1].match_score);
}

#[test]
fn test_integration_insufficient_profile() {
    let profile = StudentProfile {
        marks: vec![],
        preferences: Some(create_test_preferences(false, None)),
    };

    let result = compute_matches(&profile, &mixed_catalog());

    assert!(matches!(
        result,
        Err(MatchError::InsufficientProfile { missing_marks: true, .. })
    ));
}

#[test]
fn test_integration_literacy_does_not_satisfy_mathematics() {
    let profile = StudentProfile {
        marks: vec![AcademicMark::new("Mathematical Literacy", 95.0)],
        preferences: Some(create_test_preferences(false, None)),
    };
    let catalog = vec![create_test_entry(1, "BSc Computer Science", "western cape", None, &[("Mathematics", 50.0)])];

    let results = compute_matches(&profile, &catalog).unwrap();

    let status = &results[0].program.requirements[0];
    assert!(!status.met);
    assert_eq!(status.resolved_grade, None);
    assert_eq!(results[0].requirement_ratio, 0.0);
}

#[test]
fn test_integration_defective_program_is_isolated() {
    let mut catalog = mixed_catalog();
    catalog[0].requirements[0].min_grade_percentage = f64::NAN;

    let outcome = Matcher::default()
        .compute_matches(&create_test_profile(true, None), &catalog)
        .unwrap();

    assert_eq!(outcome.matches.len(), 4);
    assert_eq!(outcome.excluded.defective, 1);
    assert!(outcome.matches.iter().all(|m| m.program.program_id != 1));
}

#[test]
fn test_integration_free_text_marks() {
    let profile = StudentProfile {
        marks: vec![
            AcademicMark::new("Pure Maths", 82.0),
            AcademicMark::new("english home language", 71.0),
        ],
        preferences: Some(create_test_preferences(false, None)),
    };
    let catalog = vec![create_test_entry(
        1,
        "BSc Computer Science",
        "western cape",
        None,
        &[("Mathematics", 70.0), ("English", 60.0)],
    )];

    let results = compute_matches(&profile, &catalog).unwrap();

    let requirements = &results[0].program.requirements;
    assert_eq!(requirements[0].resolved_grade, Some(82.0));
    assert_eq!(requirements[1].resolved_grade, Some(71.0));
    assert_eq!(results[0].requirement_ratio, 1.0);
}

#[test]
fn test_integration_no_preferred_province() {
    let mut preferences = create_test_preferences(false, None);
    preferences.location = None;
    let profile = StudentProfile {
        marks: vec![AcademicMark::new("Mathematics", 70.0)],
        preferences: Some(preferences),
    };
    let catalog = vec![
        create_test_entry(1, "BSc Computer Science", "Gauteng", None, &[]),
        create_test_entry(2, "BSc Computer Science", "", None, &[]),
    ];

    let outcome = Matcher::default().compute_matches(&profile, &catalog).unwrap();
    let ids: Vec<i64> = outcome.matches.iter().map(|m| m.program.program_id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(outcome.excluded.out_of_province, 1);

    // Willing to move: kept, with the relocation penalty
    let mut relocating = profile.clone();
    if let Some(preferences) = relocating.preferences.as_mut() {
        preferences.relocate = true;
    }
    let results = compute_matches(&relocating, &catalog).unwrap();
    let gauteng = results.iter().find(|r| r.program.program_id == 1).unwrap();
    assert_eq!(gauteng.breakdown.location_penalty, -0.05);
}

#[test]
fn test_integration_half_point_score_rounds_to_even() {
    let profile = StudentProfile {
        marks: vec![AcademicMark::new("Mathematics", 60.0)],
        preferences: Some(StudentPreferences {
            location: Some("western cape".to_string()),
            study_mode: Some("full-time".to_string()),
            ..Default::default()
        }),
    };
    let catalog = vec![create_test_entry(
        1,
        "Diploma in Hospitality",
        "western cape",
        None,
        &[("Mathematics", 60.0), ("Accounting", 50.0)],
    )];

    let results = compute_matches(&profile, &catalog).unwrap();

    assert_eq!(results[0].requirement_ratio, 0.5);
    assert_eq!(results[0].text_similarity, 0.0);
    assert_eq!(results[0].match_score, 32);
}
