use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::SymptomTrend;

/// One patient's last reported state for one symptom. Supplied by the
/// history collaborator; read-only input to escalation scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomHistory {
    pub symptom: String,
    /// Last composite grade, 0-4.
    pub last_grade: u8,
    pub trend: SymptomTrend,
    pub last_reported: NaiveDate,
}

/// Per-symptom history lookup. Normalizes the "has history or not"
/// question into a single `Option` at the escalation entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryIndex {
    by_symptom: HashMap<String, SymptomHistory>,
}

impl HistoryIndex {
    pub fn from_records(records: Vec<SymptomHistory>) -> Self {
        let by_symptom = records
            .into_iter()
            .map(|r| (r.symptom.clone(), r))
            .collect();
        Self { by_symptom }
    }

    /// No history at all; every symptom scores at baseline.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, symptom: &str) -> Option<&SymptomHistory> {
        self.by_symptom.get(symptom)
    }

    pub fn is_empty(&self) -> bool {
        self.by_symptom.is_empty()
    }
}
