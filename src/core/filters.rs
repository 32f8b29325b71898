use crate::models::{CatalogEntry, Program, StudentPreferences};

const CURRENCY_MARKERS: &[&str] = &["ZAR", "R", "$", "€", "£"];

/// Parse a free-text fee such as `"R 25,000"` into a number
///
/// Thousands separators, currency markers and whitespace are stripped;
/// anything else that does not parse yields `None`.
pub fn parse_fee(fee: &str) -> Option<f64> {
    let mut cleaned: String = fee
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|fee| fee.is_finite())
}

/// Budget pre-filter
///
/// Programs whose fee is missing or unparseable never pass an active budget.
#[inline]
pub fn within_budget(program: &Program, max_fee: f64) -> bool {
    program
        .fees
        .as_deref()
        .and_then(parse_fee)
        .is_some_and(|fee| fee <= max_fee)
}

/// Outcome of comparing a program's province with the student's
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationOutcome {
    /// Same province, or nothing to compare
    InProvince,
    /// Different province, student is willing to move
    Relocation { penalty: f64 },
    /// Different province, student is not willing to move
    Excluded,
}

impl LocationOutcome {
    pub fn penalty(&self) -> f64 {
        match self {
            LocationOutcome::Relocation { penalty } => -penalty,
            _ => 0.0,
        }
    }
}

/// Location hard filter and soft penalty
///
/// A blank program province has nothing to compare and counts as a match.
/// A student without a preferred province matches no named province.
pub fn location_outcome(
    entry: &CatalogEntry,
    preferences: &StudentPreferences,
    relocation_penalty: f64,
) -> LocationOutcome {
    let province = entry.university.province_state.trim().to_lowercase();
    if province.is_empty() {
        return LocationOutcome::InProvince;
    }

    if preferences.preferred_province().as_deref() == Some(province.as_str()) {
        return LocationOutcome::InProvince;
    }

    if preferences.relocate {
        LocationOutcome::Relocation {
            penalty: relocation_penalty,
        }
    } else {
        LocationOutcome::Excluded
    }
}

/// 1.0 when the program's degree type is one of the preferred degrees
#[inline]
pub fn degree_match(program: &Program, preferences: &StudentPreferences) -> f64 {
    let degree_type = program
        .degree_type
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if degree_type.is_empty() {
        return 0.0;
    }

    let matched = preferences
        .preferred_degrees
        .iter()
        .any(|wanted| wanted.trim().to_lowercase() == degree_type);

    if matched { 1.0 } else { 0.0 }
}

/// 1.0 when the program's study mode contains the student's mode
#[inline]
pub fn study_mode_match(program: &Program, preferences: &StudentPreferences) -> f64 {
    let Some(wanted) = preferences.normalized_study_mode() else {
        return 0.0;
    };

    let offered = program.study_mode.as_deref().unwrap_or("").to_lowercase();
    if offered.contains(&wanted) { 1.0 } else { 0.0 }
}
