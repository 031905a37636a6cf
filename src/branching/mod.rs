//! Per-answer branching: a small state machine run after every
//! submitted answer, deciding which follow-up question to inject and
//! which prior answers become invalid.
//!
//! Each question is implicitly unasked → answered → (optionally)
//! invalidated. Outcomes are recomputed from scratch from the current
//! answer alone, so re-submitting or editing an answer converges to the
//! same state. Invocations for one patient's in-progress questionnaire
//! must be serialized by the caller; cross-patient calls are
//! independent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::enums::ItemAttribute;
use crate::models::ItemCatalog;

/// The live, ordered question list with an explicit insertion point.
/// "Insert immediately after the current question" is a named operation
/// here, not an index computation at the call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPlan {
    item_ids: Vec<String>,
    cursor: usize,
}

impl QuestionPlan {
    pub fn new(item_ids: Vec<String>) -> Self {
        Self {
            item_ids,
            cursor: 0,
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == item_id)
    }

    pub fn position_of(&self, item_id: &str) -> Option<usize> {
        self.item_ids.iter().position(|id| id == item_id)
    }

    /// Move the insertion point to the question just answered. Answers
    /// to items outside the plan leave the cursor unchanged.
    pub fn focus(&mut self, item_id: &str) {
        if let Some(position) = self.position_of(item_id) {
            self.cursor = position;
        }
    }

    /// Inject a follow-up immediately after the current question.
    pub fn insert_after_current(&mut self, item_id: String) {
        let at = (self.cursor + 1).min(self.item_ids.len());
        self.item_ids.insert(at, item_id);
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

/// Answers recorded so far, keyed by item id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerState {
    answers: BTreeMap<String, u8>,
}

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item_id: &str, value: u8) {
        self.answers.insert(item_id.to_string(), value);
    }

    pub fn remove(&mut self, item_id: &str) {
        self.answers.remove(item_id);
    }

    pub fn get(&self, item_id: &str) -> Option<u8> {
        self.answers.get(item_id).copied()
    }

    pub fn is_answered(&self, item_id: &str) -> bool {
        self.answers.contains_key(item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.answers.iter().map(|(id, value)| (id.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// What one submitted answer changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerOutcome {
    /// Follow-up items newly injected into the plan.
    pub branch_targets: Vec<String>,
    /// Items in the plan to suppress for this symptom.
    pub skipped_item_ids: Vec<String>,
    /// Previously-answered items deleted because the new skip set covers
    /// them.
    pub invalidated_item_ids: Vec<String>,
}

/// The per-answer state machine. Holds only a catalog reference; all
/// questionnaire state lives in the caller's `QuestionPlan` and
/// `AnswerState`.
pub struct BranchingEngine<'a> {
    catalog: &'a ItemCatalog,
}

impl<'a> BranchingEngine<'a> {
    pub fn new(catalog: &'a ItemCatalog) -> Self {
        Self { catalog }
    }

    /// Apply one submitted `(item, value)` answer: record it, recompute
    /// the skip set from the current answer alone, delete
    /// previously-answered items the skip set now covers, and inject the
    /// interference follow-up when the trigger rule fires.
    ///
    /// Idempotent: resubmitting the same answer injects nothing twice.
    pub fn apply_answer(
        &self,
        plan: &mut QuestionPlan,
        answers: &mut AnswerState,
        item_id: &str,
        value: u8,
    ) -> Result<AnswerOutcome, EngineError> {
        let item = self
            .catalog
            .by_id(item_id)
            .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;

        answers.record(item_id, value);
        plan.focus(item_id);

        let mut outcome = AnswerOutcome::default();

        // Skip rule, independent of branching.
        let skip_attributes: &[ItemAttribute] = match item.attribute {
            ItemAttribute::Frequency | ItemAttribute::PresentAbsent if value == 0 => {
                &[ItemAttribute::Severity, ItemAttribute::Interference]
            }
            ItemAttribute::Severity if value == 0 => &[ItemAttribute::Interference],
            _ => &[],
        };
        for attribute in skip_attributes {
            if let Some(target) = self.catalog.find(&item.symptom, *attribute) {
                if plan.contains(&target.id) {
                    outcome.skipped_item_ids.push(target.id.clone());
                }
            }
        }

        for skipped_id in &outcome.skipped_item_ids {
            if answers.is_answered(skipped_id) {
                answers.remove(skipped_id);
                outcome.invalidated_item_ids.push(skipped_id.clone());
            }
        }

        // Trigger rule: a frequency or severity answer of 2+ requires the
        // interference follow-up for the same symptom.
        let triggers = matches!(
            item.attribute,
            ItemAttribute::Frequency | ItemAttribute::Severity
        ) && value >= 2;
        if triggers {
            if let Some(target) = self.catalog.find(&item.symptom, ItemAttribute::Interference) {
                if !plan.contains(&target.id) && !answers.is_answered(&target.id) {
                    plan.insert_after_current(target.id.clone());
                    outcome.branch_targets.push(target.id.clone());
                }
            }
        }

        tracing::debug!(
            item = item_id,
            value,
            branched = outcome.branch_targets.len(),
            skipped = outcome.skipped_item_ids.len(),
            invalidated = outcome.invalidated_item_ids.len(),
            "Answer applied"
        );

        Ok(outcome)
    }
}
