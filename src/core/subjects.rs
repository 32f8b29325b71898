use crate::models::{AcademicMark, MatchTuning};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static regex"));

/// Abbreviation → canonical subject name, applied after normalization.
///
/// Full-phrase entries are checked first, then single tokens are expanded.
static ALIAS_TO_CANONICAL: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        ("mathematics", &["maths", "math", "pure maths", "pure mathematics", "core maths"]),
        (
            "mathematical literacy",
            &[
                "maths lit",
                "math lit",
                "maths literacy",
                "math literacy",
                "mathematics literacy",
                "mathematical lit",
            ],
        ),
        ("information technology", &["it"]),
        ("computer applications technology", &["cat"]),
        ("physical science", &["physics", "phys sci", "physical sciences"]),
        ("life sciences", &["biology", "life science"]),
        ("english", &["english home language", "english first additional language"]),
    ];

    let mut map = HashMap::new();
    for (canonical, variants) in aliases {
        for variant in *variants {
            map.insert(*variant, *canonical);
        }
    }
    map
});

/// Lowercase, collapse runs of non-word characters to one space, trim
pub fn normalize_subject(name: &str) -> String {
    NON_WORD.replace_all(name, " ").trim().to_lowercase()
}

/// Normalize and expand known abbreviations
pub fn canonical_subject(name: &str) -> String {
    let normalized = normalize_subject(name);
    if let Some(canonical) = ALIAS_TO_CANONICAL.get(normalized.as_str()) {
        return (*canonical).to_string();
    }

    normalized
        .split_whitespace()
        .map(|token| *ALIAS_TO_CANONICAL.get(token).unwrap_or(&token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which step of the cascade produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    Exact,
    Normalized,
    Substring,
    TokenOverlap,
}

/// A student mark attributed to a requirement subject
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMark<'a> {
    pub subject: &'a str,
    pub grade: f64,
    pub strategy: ResolutionStrategy,
}

struct NormalizedMark<'a> {
    mark: &'a AcademicMark,
    canonical: String,
    tokens: HashSet<String>,
}

/// Resolves canonical requirement subjects against free-text student subjects.
///
/// The student side is normalized once on construction so a whole catalog
/// pass reuses it.
pub struct SubjectResolver<'a> {
    marks: &'a [AcademicMark],
    normalized: Vec<NormalizedMark<'a>>,
    overlap_threshold: f64,
}

impl<'a> SubjectResolver<'a> {
    pub fn new(marks: &'a [AcademicMark], overlap_threshold: f64) -> Self {
        let normalized = marks
            .iter()
            .filter_map(|mark| {
                let canonical = canonical_subject(&mark.subject_name);
                if canonical.is_empty() {
                    return None;
                }
                let tokens = canonical.split_whitespace().map(str::to_string).collect();
                Some(NormalizedMark { mark, canonical, tokens })
            })
            .collect();

        Self {
            marks,
            normalized,
            overlap_threshold,
        }
    }

    pub fn with_default_threshold(marks: &'a [AcademicMark]) -> Self {
        Self::new(marks, MatchTuning::default().token_overlap_threshold)
    }

    /// Student subject names that survived normalization
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.normalized.iter().map(|n| n.mark.subject_name.as_str())
    }

    /// Find the student's mark for `requirement_subject`, loosest match last
    pub fn resolve(&self, requirement_subject: &str) -> Option<ResolvedMark<'a>> {
        if requirement_subject.is_empty() {
            return None;
        }

        if let Some(mark) = self.marks.iter().find(|m| m.subject_name == requirement_subject) {
            return Some(self.hit(mark, ResolutionStrategy::Exact));
        }

        let wanted = canonical_subject(requirement_subject);
        if wanted.is_empty() {
            return None;
        }

        if let Some(n) = self.normalized.iter().find(|n| n.canonical == wanted) {
            return Some(self.hit(n.mark, ResolutionStrategy::Normalized));
        }

        if let Some(n) = self
            .normalized
            .iter()
            .find(|n| n.canonical.contains(&wanted) || wanted.contains(&n.canonical))
        {
            return Some(self.hit(n.mark, ResolutionStrategy::Substring));
        }

        let wanted_tokens: HashSet<&str> = wanted.split_whitespace().collect();
        let mut best: Option<(f64, &'a AcademicMark)> = None;
        for n in &self.normalized {
            let shared = wanted_tokens
                .iter()
                .filter(|token| n.tokens.contains(**token))
                .count();
            let overlap = shared as f64 / wanted_tokens.len().max(1) as f64;
            if overlap > best.map_or(0.0, |(score, _)| score) {
                best = Some((overlap, n.mark));
            }
        }

        match best {
            Some((overlap, mark)) if overlap >= self.overlap_threshold => {
                Some(self.hit(mark, ResolutionStrategy::TokenOverlap))
            }
            _ => None,
        }
    }

    fn hit(&self, mark: &'a AcademicMark, strategy: ResolutionStrategy) -> ResolvedMark<'a> {
        ResolvedMark {
            subject: mark.subject_name.as_str(),
            grade: mark.grade_or_percentage,
            strategy,
        }
    }
}

/// Resolve a single requirement subject with the default overlap threshold
pub fn resolve_grade(requirement_subject: &str, marks: &[AcademicMark]) -> Option<f64> {
    SubjectResolver::with_default_threshold(marks)
        .resolve(requirement_subject)
        .map(|resolved| resolved.grade)
}
