//! Orchestration: one `DecisionEngine` value owns the injected
//! reference catalogs and exposes the generation, answer, completion,
//! and triage paths. No process-wide state; every call works on the
//! snapshot it is handed.

use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::branching::{AnswerOutcome, AnswerState, BranchingEngine, QuestionPlan};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grading::{grade_submission, GradingResult};
use crate::models::{
    DrugModuleCatalog, HistoryIndex, ItemCatalog, Regimen, RegimenCatalog, Treatment,
};
use crate::reference::ReferenceData;
use crate::selection::{
    select_by_drug_modules, select_by_regimen, DrugModuleSelection, SelectedItem,
};
use crate::timeline::{assess_nadir, profile_treatment, NadirAssessment, TreatmentContext};
use crate::triage::{build_triage_queue, derive_alerts, Alert, PatientReport, TriageQueue};

/// Output of the regimen-based generation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimenQuestionnaire {
    pub items: Vec<SelectedItem>,
    pub context: TreatmentContext,
}

/// Output of the completion path: one grading result per answered
/// symptom plus zero or more alerts. The alerts stay available to the
/// caller whatever happens downstream; a storage failure must never
/// suppress a detected grade-3/4 symptom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub results: Vec<GradingResult>,
    pub alerts: Vec<Alert>,
}

/// The clinical decision engine. Construct once with loaded reference
/// data; safe to share across concurrent requests.
pub struct DecisionEngine {
    items: ItemCatalog,
    drug_modules: DrugModuleCatalog,
    regimens: RegimenCatalog,
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(reference: ReferenceData, config: EngineConfig) -> Self {
        Self {
            items: reference.items,
            drug_modules: reference.drug_modules,
            regimens: reference.regimens,
            config,
        }
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    fn regimen(&self, code: &str) -> Result<&Regimen, EngineError> {
        self.regimens
            .get(code)
            .ok_or_else(|| EngineError::UnknownRegimen(code.to_string()))
    }

    fn check_cycle(treatment: &Treatment) -> Result<(), EngineError> {
        // Cycles are 1-based; zero means the record carries no current
        // cycle and the operation must abort rather than assume one.
        if treatment.current_cycle == 0 {
            return Err(EngineError::NoCurrentCycle(treatment.id));
        }
        Ok(())
    }

    /// Timeline path: profile where the patient is in their cycle.
    pub fn profile(
        &self,
        treatment: &Treatment,
        eval_date: NaiveDate,
    ) -> Result<TreatmentContext, EngineError> {
        Self::check_cycle(treatment)?;
        let regimen = self.regimen(&treatment.regimen_code)?;
        Ok(profile_treatment(treatment, regimen, eval_date))
    }

    /// Nadir guidance for the same instant.
    pub fn assess_nadir(
        &self,
        treatment: &Treatment,
        eval_date: NaiveDate,
    ) -> Result<NadirAssessment, EngineError> {
        let context = self.profile(treatment, eval_date)?;
        let regimen = self.regimen(&treatment.regimen_code)?;
        Ok(assess_nadir(context.treatment_day, regimen))
    }

    /// Generation path, legacy algorithm: regimen toxicity profile and
    /// cycle phase.
    pub fn generate_by_regimen(
        &self,
        treatment: &Treatment,
        history: &HistoryIndex,
        eval_date: NaiveDate,
    ) -> Result<RegimenQuestionnaire, EngineError> {
        let start = Instant::now();
        let context = self.profile(treatment, eval_date)?;
        let regimen = self.regimen(&treatment.regimen_code)?;
        let items = select_by_regimen(&self.items, regimen, &context, history);

        tracing::info!(
            patient_id = %treatment.patient_id,
            regimen = %regimen.code,
            items = items.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Regimen-based questionnaire generated"
        );

        Ok(RegimenQuestionnaire { items, context })
    }

    /// Generation path, current algorithm: drug-module union with
    /// safety proxies and phase filtering.
    pub fn generate_by_drug_modules(
        &self,
        treatment: &Treatment,
        history: &HistoryIndex,
        eval_date: NaiveDate,
    ) -> Result<DrugModuleSelection, EngineError> {
        let start = Instant::now();
        let context = self.profile(treatment, eval_date)?;
        let regimen = self.regimen(&treatment.regimen_code)?;
        let selection = select_by_drug_modules(
            &self.items,
            &self.drug_modules,
            regimen,
            &context,
            history,
            &self.config,
        )?;

        tracing::info!(
            patient_id = %treatment.patient_id,
            regimen = %regimen.code,
            items = selection.items.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Drug-module questionnaire generated"
        );

        Ok(selection)
    }

    /// Answer path: run the branching state machine for one submitted
    /// answer. Calls for one patient's questionnaire must be serialized
    /// by the caller.
    pub fn apply_answer(
        &self,
        plan: &mut QuestionPlan,
        answers: &mut AnswerState,
        item_id: &str,
        value: u8,
    ) -> Result<AnswerOutcome, EngineError> {
        BranchingEngine::new(&self.items).apply_answer(plan, answers, item_id, value)
    }

    /// Completion path: grade every answered symptom and derive alerts.
    pub fn complete_questionnaire(
        &self,
        answers: &AnswerState,
        context: Option<&TreatmentContext>,
        history: &HistoryIndex,
    ) -> Result<CompletionOutcome, EngineError> {
        let start = Instant::now();
        let results = grade_submission(&self.items, answers)?;
        let alerts = derive_alerts(&results, context, history);

        tracing::info!(
            symptoms = results.len(),
            alerts = alerts.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Questionnaire completion processed"
        );

        Ok(CompletionOutcome { results, alerts })
    }

    /// Triage path: rank completed reports into the review queue.
    pub fn triage(&self, reports: &[PatientReport], now: NaiveDateTime) -> TriageQueue {
        build_triage_queue(reports, now)
    }
}
