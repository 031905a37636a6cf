use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::CyclePhase;
use crate::models::{Regimen, Treatment};

/// Read-only snapshot of one patient's position in their treatment
/// cycle at one evaluation instant. Built fresh on every call; values
/// stay consistent across a whole questionnaire-generation request
/// because nothing here is cached or mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentContext {
    pub regimen_code: String,
    pub cycle_number: u32,
    /// 1-based days since the last infusion (infusion day = day 1).
    pub treatment_day: i64,
    /// 1-based days since the first infusion of the course.
    pub absolute_treatment_day: i64,
    pub phase: CyclePhase,
    /// Computed independently of the phase precedence chain: a day can
    /// be inside the nadir window while resolving to a higher-precedence
    /// phase when the windows overlap.
    pub in_nadir_window: bool,
    pub last_infusion_date: NaiveDate,
    pub next_infusion_date: Option<NaiveDate>,
    pub days_until_next_infusion: i64,
}

/// 1-based treatment day: floor of whole days elapsed, plus one.
pub fn treatment_day(infusion_date: NaiveDate, eval_date: NaiveDate) -> i64 {
    eval_date.signed_duration_since(infusion_date).num_days() + 1
}

/// Resolve the cycle phase for a treatment day. First match wins:
/// pre-session, post-session, recovery, regimen nadir window,
/// inter-cycle.
pub fn determine_cycle_phase(treatment_day: i64, regimen: &Regimen) -> CyclePhase {
    let len = regimen.cycle_length_days as i64;
    if treatment_day >= len - 1 && treatment_day <= len + 1 {
        CyclePhase::PreSession
    } else if (1..=3).contains(&treatment_day) {
        CyclePhase::PostSession
    } else if (4..=6).contains(&treatment_day) {
        CyclePhase::Recovery
    } else if is_in_nadir_window(treatment_day, regimen) {
        CyclePhase::Nadir
    } else {
        CyclePhase::InterCycle
    }
}

/// The nadir-window test, independent of phase precedence.
pub fn is_in_nadir_window(treatment_day: i64, regimen: &Regimen) -> bool {
    regimen
        .nadir_window
        .map_or(false, |w| w.contains(treatment_day))
}

/// Days until the next infusion: planned date minus evaluation date when
/// scheduled, else the remainder of the cycle.
pub fn days_until_next_infusion(
    treatment_day: i64,
    next_infusion_date: Option<NaiveDate>,
    eval_date: NaiveDate,
    regimen: &Regimen,
) -> i64 {
    match next_infusion_date {
        Some(next) => next.signed_duration_since(eval_date).num_days(),
        None => regimen.cycle_length_days as i64 - treatment_day,
    }
}

/// Assemble the full context for one patient at one instant.
pub fn profile_treatment(
    treatment: &Treatment,
    regimen: &Regimen,
    eval_date: NaiveDate,
) -> TreatmentContext {
    let day = treatment_day(treatment.last_infusion_date, eval_date);
    let phase = determine_cycle_phase(day, regimen);
    let in_nadir_window = is_in_nadir_window(day, regimen);

    let context = TreatmentContext {
        regimen_code: regimen.code.clone(),
        cycle_number: treatment.current_cycle,
        treatment_day: day,
        absolute_treatment_day: treatment_day(treatment.first_infusion_date, eval_date),
        phase,
        in_nadir_window,
        last_infusion_date: treatment.last_infusion_date,
        next_infusion_date: treatment.next_infusion_date,
        days_until_next_infusion: days_until_next_infusion(
            day,
            treatment.next_infusion_date,
            eval_date,
            regimen,
        ),
    };

    tracing::debug!(
        patient_id = %treatment.patient_id,
        regimen = %context.regimen_code,
        cycle = context.cycle_number,
        day = context.treatment_day,
        phase = context.phase.as_str(),
        in_nadir_window = context.in_nadir_window,
        "Treatment context profiled"
    );

    context
}
