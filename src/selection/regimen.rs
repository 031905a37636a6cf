use crate::models::enums::CyclePhase;
use crate::models::{HistoryIndex, ItemCatalog, Regimen, SymptomItem};
use crate::timeline::TreatmentContext;

use super::{assemble_questionnaire, universal_phase_symptoms, SelectedItem};

/// Regimen-based question selection.
///
/// Filters the catalog by the regimen's high-risk symptom list, narrows
/// to the phase-priority list (the regimen's own, else the universal
/// table), then runs the shared escalation scoring and completeness
/// pass. All qualifying items are returned; there is no item cap, and
/// adaptive skip/branch logic bounds real-world completion time.
pub fn select_by_regimen(
    catalog: &ItemCatalog,
    regimen: &Regimen,
    context: &TreatmentContext,
    history: &HistoryIndex,
) -> Vec<SelectedItem> {
    let high_risk_filtered: Vec<&SymptomItem> = catalog
        .iter()
        .filter(|item| match &regimen.toxicity.high_risk {
            Some(list) => list.iter().any(|s| s == &item.symptom),
            None => true,
        })
        .collect();

    let phase_list = phase_priority_list(regimen, context.phase);
    let candidates: Vec<&SymptomItem> = high_risk_filtered
        .into_iter()
        .filter(|item| phase_list.iter().any(|s| s == &item.symptom))
        .collect();

    let selected = assemble_questionnaire(&candidates, catalog, history);

    tracing::debug!(
        regimen = %regimen.code,
        phase = context.phase.as_str(),
        candidates = candidates.len(),
        selected = selected.len(),
        "Regimen-based selection complete"
    );

    selected
}

fn phase_priority_list(regimen: &Regimen, phase: CyclePhase) -> Vec<String> {
    regimen
        .toxicity
        .phase_priorities
        .as_ref()
        .and_then(|priorities| priorities.get(&phase))
        .cloned()
        .unwrap_or_else(|| {
            universal_phase_symptoms(phase)
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
}
