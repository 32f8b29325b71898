use crate::models::{Program, StudentPreferences};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("static regex"));

/// Term-frequency bag of words
pub type TermFrequencies = HashMap<String, u32>;

/// Lowercased word tokens, single-character tokens dropped
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

pub fn term_frequencies(text: &str) -> TermFrequencies {
    let mut counts = TermFrequencies::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of two frequency vectors; 0 when either is empty
pub fn cosine_similarity(a: &TermFrequencies, b: &TermFrequencies) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(term, count)| b.get(term).map(|other| (*count as f64) * (*other as f64)))
        .sum();
    let norm_a = a.values().map(|c| (*c as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.values().map(|c| (*c as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Topical closeness of two free texts in `[0, 1]`
pub fn text_similarity(student_text: &str, program_text: &str) -> f64 {
    cosine_similarity(&term_frequencies(student_text), &term_frequencies(program_text))
}

/// Focus area, preferred degrees and career interests joined into one text
pub fn student_text(preferences: &StudentPreferences) -> String {
    preferences
        .focus_area
        .iter()
        .chain(preferences.preferred_degrees.iter())
        .chain(preferences.career_interests.iter())
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name, description, degree type and location joined into one text
pub fn program_text(program: &Program) -> String {
    std::iter::once(Some(program.program_name.as_str()))
        .chain([
            program.description.as_deref(),
            program.degree_type.as_deref(),
            program.location.as_deref(),
        ])
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
