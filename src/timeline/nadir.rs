use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::{InfectionRisk, NadirPhase};
use crate::models::{NadirWindow, Regimen};

/// Symptoms always prioritized while counts are low.
pub const CORE_NADIR_SYMPTOMS: &[&str] = &["infection_signs", "fever", "bleeding", "bruising"];

/// Refined view of a day inside (or outside) the nadir window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NadirAssessment {
    pub phase: NadirPhase,
    pub infection_risk: InfectionRisk,
    /// Core symptoms first, then phase-specific additions.
    pub priority_symptoms: Vec<String>,
}

/// Split the window into thirds: the first ⌈33%⌉ days are `early`, the
/// last ⌊33%⌋ (counted by remaining days until the end) are `late`, and
/// the middle is `peak`.
pub fn nadir_phase(treatment_day: i64, window: &NadirWindow) -> NadirPhase {
    if !window.contains(treatment_day) {
        return NadirPhase::None;
    }
    let len = window.len_days();
    let early_len = (len as f64 * 0.33).ceil() as i64;
    let late_len = (len as f64 * 0.33).floor() as i64;

    let days_in = treatment_day - window.start_day as i64;
    let days_remaining = window.end_day as i64 - treatment_day;

    if days_in < early_len {
        NadirPhase::Early
    } else if days_remaining < late_len {
        NadirPhase::Late
    } else {
        NadirPhase::Peak
    }
}

pub fn infection_risk(phase: NadirPhase) -> InfectionRisk {
    match phase {
        NadirPhase::None => InfectionRisk::Low,
        NadirPhase::Early => InfectionRisk::Moderate,
        NadirPhase::Peak => InfectionRisk::VeryHigh,
        NadirPhase::Late => InfectionRisk::High,
    }
}

fn priority_symptoms(phase: NadirPhase) -> Vec<String> {
    let mut symptoms: Vec<String> = CORE_NADIR_SYMPTOMS.iter().map(|s| s.to_string()).collect();
    let additions: &[&str] = match phase {
        NadirPhase::Early => &["fatigue", "weakness"],
        NadirPhase::Peak => &["shortness_of_breath", "dizziness", "chills"],
        NadirPhase::Late => &["mouth_sores", "skin_changes"],
        NadirPhase::None => &[],
    };
    symptoms.extend(additions.iter().map(|s| s.to_string()));
    symptoms
}

/// Assess a treatment day against the regimen's nadir window. Regimens
/// without a window always assess as outside.
pub fn assess_nadir(treatment_day: i64, regimen: &Regimen) -> NadirAssessment {
    let phase = regimen
        .nadir_window
        .map_or(NadirPhase::None, |w| nadir_phase(treatment_day, &w));
    NadirAssessment {
        phase,
        infection_risk: infection_risk(phase),
        priority_symptoms: priority_symptoms(phase),
    }
}

/// Calendar dates of the nadir window for a given infusion date.
/// Day 1 is the infusion day, so the window starts `start_day - 1` days
/// later.
pub fn nadir_calendar_dates(
    infusion_date: NaiveDate,
    window: &NadirWindow,
) -> (NaiveDate, NaiveDate) {
    (
        infusion_date + chrono::Duration::days(window.start_day as i64 - 1),
        infusion_date + chrono::Duration::days(window.end_day as i64 - 1),
    )
}
