//! Question selection: narrowing the symptom-item catalog to what this
//! patient should be asked right now.
//!
//! Two selectors share the same escalation scoring and completeness
//! pass. The regimen-based selector filters by the regimen's toxicity
//! profile and cycle phase; the drug-module selector unions the active
//! drugs' symptom contributions and applies per-symptom phase rules.

mod drug_modules;
mod regimen;

pub use drug_modules::*;
pub use regimen::*;

use serde::{Deserialize, Serialize};

use crate::models::enums::{CyclePhase, ItemAttribute, SymptomTrend};
use crate::models::{HistoryIndex, ItemCatalog, SymptomItem};

/// One selected question, annotated for presentation and branching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedItem {
    pub item: SymptomItem,
    /// History-escalation score of the item's symptom.
    pub score: f32,
    /// Frequency and severity answers feed the branching engine.
    pub requires_branch_eval: bool,
}

/// Fallback phase-priority table used when a regimen defines no
/// phase-specific symptom list of its own.
pub fn universal_phase_symptoms(phase: CyclePhase) -> &'static [&'static str] {
    match phase {
        CyclePhase::PostSession => &[
            "nausea",
            "vomiting",
            "appetite_loss",
            "fatigue",
            "constipation",
        ],
        CyclePhase::Recovery => &[
            "nausea",
            "fatigue",
            "mouth_sores",
            "diarrhea",
            "constipation",
        ],
        CyclePhase::Nadir => &[
            "fever",
            "chills",
            "infection_signs",
            "bleeding",
            "bruising",
            "fatigue",
        ],
        CyclePhase::PreSession => &[
            "fatigue",
            "numbness_tingling",
            "anxiety",
            "pain",
            "nausea",
        ],
        CyclePhase::InterCycle => &[
            "fatigue",
            "numbness_tingling",
            "pain",
            "skin_changes",
            "anxiety",
        ],
    }
}

/// History-escalation score for one symptom. Base 1; +2 at last grade
/// ≥2; +2 more at ≥3; +1 when worsening; −0.5 when improving from a
/// grade below 2. Symptoms without history score the baseline 1.
pub fn history_score(symptom: &str, history: &HistoryIndex) -> f32 {
    let mut score = 1.0;
    if let Some(record) = history.get(symptom) {
        if record.last_grade >= 2 {
            score += 2.0;
        }
        if record.last_grade >= 3 {
            score += 2.0;
        }
        if record.trend == SymptomTrend::Worsening {
            score += 1.0;
        }
        if record.trend == SymptomTrend::Improving && record.last_grade < 2 {
            score -= 0.5;
        }
    }
    score
}

/// Group candidates by symptom, run the completeness pass, score by
/// history, and emit the final ordered questionnaire: groups sorted by
/// descending score (stable, so ties keep catalog order), items within
/// a group in presence → severity → interference order.
///
/// Completeness: every group must carry its symptom's presence-class
/// item (`present_absent`/`amount` preferred over `frequency`) and its
/// `severity` item, pulled from the full catalog when the filters
/// dropped them. `interference` is never force-added.
pub fn assemble_questionnaire(
    candidates: &[&SymptomItem],
    catalog: &ItemCatalog,
    history: &HistoryIndex,
) -> Vec<SelectedItem> {
    // Group in first-seen order.
    let mut groups: Vec<(String, Vec<SymptomItem>)> = Vec::new();
    for item in candidates {
        match groups.iter().position(|(symptom, _)| symptom == &item.symptom) {
            Some(idx) => {
                let items = &mut groups[idx].1;
                if !items.iter().any(|i| i.id == item.id) {
                    items.push((*item).clone());
                }
            }
            None => groups.push((item.symptom.clone(), vec![(*item).clone()])),
        }
    }

    let mut scored: Vec<(f32, Vec<SymptomItem>)> = groups
        .into_iter()
        .map(|(symptom, items)| {
            (
                history_score(&symptom, history),
                complete_group(&symptom, items, catalog),
            )
        })
        .collect();

    // Stable: equal scores keep catalog order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .flat_map(|(score, items)| {
            items.into_iter().map(move |item| {
                let requires_branch_eval = matches!(
                    item.attribute,
                    ItemAttribute::Frequency | ItemAttribute::Severity
                );
                SelectedItem {
                    item,
                    score,
                    requires_branch_eval,
                }
            })
        })
        .collect()
}

/// Order one symptom group and fill in missing companion attributes.
fn complete_group(
    symptom: &str,
    items: Vec<SymptomItem>,
    catalog: &ItemCatalog,
) -> Vec<SymptomItem> {
    let preferred_presence = items
        .iter()
        .find(|i| matches!(i.attribute, ItemAttribute::PresentAbsent | ItemAttribute::Amount))
        .or_else(|| items.iter().find(|i| i.attribute == ItemAttribute::Frequency))
        .cloned();

    let presence = preferred_presence.or_else(|| {
        catalog
            .find(symptom, ItemAttribute::PresentAbsent)
            .or_else(|| catalog.find(symptom, ItemAttribute::Amount))
            .or_else(|| catalog.find(symptom, ItemAttribute::Frequency))
            .cloned()
    });

    let severity = items
        .iter()
        .find(|i| i.attribute == ItemAttribute::Severity)
        .cloned()
        .or_else(|| catalog.find(symptom, ItemAttribute::Severity).cloned());

    let mut ordered: Vec<SymptomItem> = Vec::new();
    if let Some(presence) = presence {
        ordered.push(presence);
    }
    // Any further presence-class items the filters already selected stay,
    // in catalog order, behind the chosen one.
    for item in &items {
        if item.attribute.is_presence_class() && !ordered.iter().any(|o| o.id == item.id) {
            ordered.push(item.clone());
        }
    }
    if let Some(severity) = severity {
        ordered.push(severity);
    }
    if let Some(interference) = items
        .iter()
        .find(|i| i.attribute == ItemAttribute::Interference)
    {
        ordered.push(interference.clone());
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymptomHistory;
    use crate::reference::ReferenceData;
    use chrono::NaiveDate;

    fn history_with(symptom: &str, last_grade: u8, trend: SymptomTrend) -> HistoryIndex {
        HistoryIndex::from_records(vec![SymptomHistory {
            symptom: symptom.into(),
            last_grade,
            trend,
            last_reported: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        }])
    }

    #[test]
    fn baseline_score_without_history() {
        assert_eq!(history_score("nausea", &HistoryIndex::empty()), 1.0);
    }

    #[test]
    fn escalation_is_cumulative() {
        assert_eq!(
            history_score("nausea", &history_with("nausea", 2, SymptomTrend::Stable)),
            3.0
        );
        assert_eq!(
            history_score("nausea", &history_with("nausea", 3, SymptomTrend::Stable)),
            5.0
        );
        assert_eq!(
            history_score("nausea", &history_with("nausea", 3, SymptomTrend::Worsening)),
            6.0
        );
        assert_eq!(
            history_score("nausea", &history_with("nausea", 1, SymptomTrend::Improving)),
            0.5
        );
        // Improving discount only applies below grade 2.
        assert_eq!(
            history_score("nausea", &history_with("nausea", 2, SymptomTrend::Improving)),
            3.0
        );
    }

    #[test]
    fn completeness_pulls_missing_severity_from_catalog() {
        let data = ReferenceData::load_test();
        let frequency_only = vec![data.items.by_id("nausea_frequency").unwrap()];
        let selected = assemble_questionnaire(&frequency_only, &data.items, &HistoryIndex::empty());
        let ids: Vec<&str> = selected.iter().map(|s| s.item.id.as_str()).collect();
        assert_eq!(ids, vec!["nausea_frequency", "nausea_severity"]);
    }

    #[test]
    fn completeness_prefers_amount_over_frequency() {
        let data = ReferenceData::load_test();
        let candidates = vec![
            data.items.by_id("vomiting_frequency").unwrap(),
            data.items.by_id("vomiting_amount").unwrap(),
            data.items.by_id("vomiting_severity").unwrap(),
        ];
        let selected = assemble_questionnaire(&candidates, &data.items, &HistoryIndex::empty());
        assert_eq!(selected[0].item.id, "vomiting_amount");
        // The already-selected frequency item stays, behind the chosen one.
        assert!(selected.iter().any(|s| s.item.id == "vomiting_frequency"));
    }

    #[test]
    fn interference_is_never_force_added() {
        let data = ReferenceData::load_test();
        let candidates = vec![data.items.by_id("nausea_frequency").unwrap()];
        let selected = assemble_questionnaire(&candidates, &data.items, &HistoryIndex::empty());
        assert!(selected.iter().all(|s| s.item.id != "nausea_interference"));
    }

    #[test]
    fn interference_kept_when_already_selected() {
        let data = ReferenceData::load_test();
        let candidates = vec![
            data.items.by_id("nausea_interference").unwrap(),
            data.items.by_id("nausea_frequency").unwrap(),
        ];
        let selected = assemble_questionnaire(&candidates, &data.items, &HistoryIndex::empty());
        let ids: Vec<&str> = selected.iter().map(|s| s.item.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["nausea_frequency", "nausea_severity", "nausea_interference"]
        );
    }

    #[test]
    fn groups_sort_by_score_with_stable_ties() {
        let data = ReferenceData::load_test();
        let history = history_with("fatigue", 3, SymptomTrend::Worsening);
        let candidates = vec![
            data.items.by_id("nausea_frequency").unwrap(),
            data.items.by_id("fatigue_severity").unwrap(),
            data.items.by_id("anxiety_frequency").unwrap(),
        ];
        let selected = assemble_questionnaire(&candidates, &data.items, &history);
        // Fatigue escalates to the front; nausea and anxiety tie at 1 and
        // keep their candidate order.
        assert_eq!(selected[0].item.symptom, "fatigue");
        let nausea_pos = selected.iter().position(|s| s.item.symptom == "nausea");
        let anxiety_pos = selected.iter().position(|s| s.item.symptom == "anxiety");
        assert!(nausea_pos < anxiety_pos);
    }

    #[test]
    fn frequency_and_severity_flagged_for_branching() {
        let data = ReferenceData::load_test();
        let candidates = vec![
            data.items.by_id("nausea_frequency").unwrap(),
            data.items.by_id("fever_present_absent").unwrap(),
        ];
        let selected = assemble_questionnaire(&candidates, &data.items, &HistoryIndex::empty());
        for s in &selected {
            let expected = matches!(
                s.item.attribute,
                ItemAttribute::Frequency | ItemAttribute::Severity
            );
            assert_eq!(s.requires_branch_eval, expected, "{}", s.item.id);
        }
    }
}
