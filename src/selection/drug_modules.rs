use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::enums::CyclePhase;
use crate::models::{DrugModule, DrugModuleCatalog, HistoryIndex, ItemCatalog, Regimen, SymptomItem};
use crate::timeline::TreatmentContext;

use super::{assemble_questionnaire, SelectedItem};

/// Per-symptom bookkeeping produced by unioning the active drugs'
/// contributions. Part of the generation audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomSource {
    pub symptom: String,
    pub contributing_drugs: Vec<String>,
    /// Sticky: once any drug contributes the symptom as a safety proxy,
    /// it stays a safety proxy.
    pub is_safety_proxy: bool,
    /// Union of the contributing drugs' phase rules. Always `None` for
    /// safety-proxy symptoms.
    pub phase_restriction: Option<HashSet<CyclePhase>>,
}

impl SymptomSource {
    fn passes_phase_filter(&self, phase: CyclePhase) -> bool {
        self.is_safety_proxy
            || self
                .phase_restriction
                .as_ref()
                .map_or(true, |phases| phases.contains(&phase))
    }
}

/// Audit metadata returned alongside a drug-module questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub active_drugs: Vec<String>,
    pub step_name: Option<String>,
    /// Full union result, including symptoms the phase filter removed.
    pub sources: Vec<SymptomSource>,
    pub symptoms_before_union: usize,
    pub symptoms_after_union: usize,
    pub symptoms_after_phase_filter: usize,
    pub phase_filtering_applied: bool,
    pub phase: CyclePhase,
    pub treatment_day: i64,
    pub in_nadir_window: bool,
    pub regimen_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugModuleSelection {
    pub items: Vec<SelectedItem>,
    pub metadata: GenerationMetadata,
}

/// Resolve which drugs are active for the current cycle: the first
/// composition step covering the cycle wins. Falls back to the
/// regimen's generic drug-component list (with no step name) when no
/// composition is defined or no step covers the cycle.
pub fn resolve_active_drugs(regimen: &Regimen, cycle: u32) -> (Vec<String>, Option<String>) {
    if let Some(composition) = &regimen.composition {
        for step in &composition.steps {
            if step.cycles.matches(cycle) {
                return (step.drugs.clone(), Some(step.name.clone()));
            }
        }
    }
    (regimen.drug_components.clone(), None)
}

/// Union symptoms across the active drug modules. Returns the sources
/// in first-seen order plus the raw count of contributed terms before
/// deduplication.
pub fn union_symptom_sources(modules: &[&DrugModule]) -> (Vec<SymptomSource>, usize) {
    let mut sources: Vec<SymptomSource> = Vec::new();
    let mut contributed = 0usize;

    let entry_for = |sources: &mut Vec<SymptomSource>, symptom: &str| -> usize {
        if let Some(idx) = sources.iter().position(|s| s.symptom == symptom) {
            idx
        } else {
            sources.push(SymptomSource {
                symptom: symptom.to_string(),
                contributing_drugs: Vec::new(),
                is_safety_proxy: false,
                phase_restriction: None,
            });
            sources.len() - 1
        }
    };

    for module in modules {
        for symptom in &module.symptoms {
            contributed += 1;
            let idx = entry_for(&mut sources, symptom);
            let source = &mut sources[idx];
            if !source.contributing_drugs.contains(&module.drug_name) {
                source.contributing_drugs.push(module.drug_name.clone());
            }
            // Safety-proxy symptoms never carry a phase restriction, no
            // matter what a direct-symptom rule says.
            if !source.is_safety_proxy {
                if let Some(rule) = module.phase_rules.get(symptom) {
                    source
                        .phase_restriction
                        .get_or_insert_with(HashSet::new)
                        .extend(rule.iter().copied());
                }
            }
        }

        for proxy in &module.safety_proxies {
            for symptom in &proxy.proxy_symptoms {
                contributed += 1;
                let idx = entry_for(&mut sources, symptom);
                let source = &mut sources[idx];
                if !source.contributing_drugs.contains(&module.drug_name) {
                    source.contributing_drugs.push(module.drug_name.clone());
                }
                source.is_safety_proxy = true;
                source.phase_restriction = None;
            }
        }
    }

    (sources, contributed)
}

/// Drug-module question selection: active drugs → symptom union →
/// phase filtering (safety proxies exempt) → catalog mapping → shared
/// scoring/completeness → hard cap at the configured target count.
pub fn select_by_drug_modules(
    catalog: &ItemCatalog,
    drug_modules: &DrugModuleCatalog,
    regimen: &Regimen,
    context: &TreatmentContext,
    history: &HistoryIndex,
    config: &EngineConfig,
) -> Result<DrugModuleSelection, EngineError> {
    let (active_drugs, step_name) = resolve_active_drugs(regimen, context.cycle_number);

    let modules: Vec<&DrugModule> = active_drugs
        .iter()
        .map(|drug| {
            drug_modules
                .get(drug)
                .ok_or_else(|| EngineError::DrugModuleNotFound(drug.clone()))
        })
        .collect::<Result<_, _>>()?;

    let (sources, symptoms_before_union) = union_symptom_sources(&modules);
    let symptoms_after_union = sources.len();

    let surviving: Vec<&SymptomSource> = sources
        .iter()
        .filter(|s| s.passes_phase_filter(context.phase))
        .collect();
    let symptoms_after_phase_filter = surviving.len();
    let phase_filtering_applied = symptoms_after_phase_filter < symptoms_after_union;

    let candidates: Vec<&SymptomItem> = surviving
        .iter()
        .flat_map(|source| catalog.items_for_symptom(&source.symptom))
        .collect();

    let mut items = assemble_questionnaire(&candidates, catalog, history);
    items.truncate(config.target_item_count);

    tracing::info!(
        regimen = %regimen.code,
        cycle = context.cycle_number,
        step = step_name.as_deref().unwrap_or("-"),
        drugs = active_drugs.len(),
        symptoms_before_union,
        symptoms_after_union,
        symptoms_after_phase_filter,
        items = items.len(),
        "Drug-module selection complete"
    );

    Ok(DrugModuleSelection {
        items,
        metadata: GenerationMetadata {
            active_drugs,
            step_name,
            sources,
            symptoms_before_union,
            symptoms_after_union,
            symptoms_after_phase_filter,
            phase_filtering_applied,
            phase: context.phase,
            treatment_day: context.treatment_day,
            in_nadir_window: context.in_nadir_window,
            regimen_code: context.regimen_code.clone(),
        },
    })
}
