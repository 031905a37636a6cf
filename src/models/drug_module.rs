use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::enums::CyclePhase;

/// A symptom tracked as an early-warning sign for a serious underlying
/// toxicity rather than because the drug directly causes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyProxyItem {
    /// What the proxy monitors for, e.g. `"neutropenia"`.
    pub monitoring_type: String,
    pub proxy_symptoms: Vec<String>,
    /// Clinical rationale, kept for the audit trail.
    pub rationale: String,
}

/// One drug's symptom and safety-monitoring contribution, composable
/// across regimens and treatment steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugModule {
    pub drug_name: String,
    pub drug_class: String,
    /// Symptoms the drug directly causes.
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub safety_proxies: Vec<SafetyProxyItem>,
    /// Per-symptom restriction: phases in which the symptom should be
    /// asked. A symptom with no entry is asked in every phase.
    #[serde(default)]
    pub phase_rules: HashMap<String, HashSet<CyclePhase>>,
    pub myelosuppressive: bool,
}

/// Read-only lookup over the loaded drug modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugModuleCatalog {
    modules: Vec<DrugModule>,
}

impl DrugModuleCatalog {
    pub fn new(modules: Vec<DrugModule>) -> Self {
        Self { modules }
    }

    pub fn get(&self, drug_name: &str) -> Option<&DrugModule> {
        self.modules
            .iter()
            .find(|m| m.drug_name.eq_ignore_ascii_case(drug_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrugModule> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
