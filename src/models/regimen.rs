use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::enums::CyclePhase;

/// The window of days after an infusion when blood counts bottom out.
/// Days are 1-based treatment days (infusion day = day 1), inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NadirWindow {
    pub start_day: u32,
    pub end_day: u32,
}

impl NadirWindow {
    pub fn contains(&self, treatment_day: i64) -> bool {
        treatment_day >= self.start_day as i64 && treatment_day <= self.end_day as i64
    }

    /// Number of days in the window, inclusive of both ends.
    pub fn len_days(&self) -> i64 {
        (self.end_day as i64 - self.start_day as i64) + 1
    }
}

/// Symptom-risk profile of a regimen, by toxicity tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToxicityProfile {
    /// Symptoms this regimen is most likely to cause. When absent, the
    /// regimen-based selector applies no high-risk filter.
    pub high_risk: Option<Vec<String>>,
    #[serde(default)]
    pub moderate_risk: Vec<String>,
    #[serde(default)]
    pub low_risk: Vec<String>,
    /// Per-phase priority symptom lists. When absent, the selector falls
    /// back to the universal phase table.
    pub phase_priorities: Option<HashMap<CyclePhase, Vec<String>>>,
}

/// Which cycle numbers a composition step applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSelector {
    All,
    Only(Vec<u32>),
}

impl CycleSelector {
    pub fn matches(&self, cycle: u32) -> bool {
        match self {
            Self::All => true,
            Self::Only(cycles) => cycles.contains(&cycle),
        }
    }
}

/// One ordered step of a regimen's drug-module composition, e.g. the
/// "AC" step of AC-T active for cycles 1-4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionStep {
    pub name: String,
    pub drugs: Vec<String>,
    pub cycles: CycleSelector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugComposition {
    pub steps: Vec<CompositionStep>,
}

/// A named chemotherapy protocol. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regimen {
    pub code: String,
    pub name: String,
    pub cycle_length_days: u32,
    pub nadir_window: Option<NadirWindow>,
    #[serde(default)]
    pub toxicity: ToxicityProfile,
    /// Ordered drug-module composition. When absent, active drugs come
    /// from `drug_components`.
    pub composition: Option<DrugComposition>,
    #[serde(default)]
    pub drug_components: Vec<String>,
}

/// Read-only lookup over the loaded regimen definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimenCatalog {
    regimens: Vec<Regimen>,
}

impl RegimenCatalog {
    pub fn new(regimens: Vec<Regimen>) -> Self {
        Self { regimens }
    }

    pub fn get(&self, code: &str) -> Option<&Regimen> {
        self.regimens.iter().find(|r| r.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Regimen> {
        self.regimens.iter()
    }

    pub fn len(&self) -> usize {
        self.regimens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regimens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nadir_window_bounds_inclusive() {
        let window = NadirWindow {
            start_day: 7,
            end_day: 12,
        };
        assert!(!window.contains(6));
        assert!(window.contains(7));
        assert!(window.contains(12));
        assert!(!window.contains(13));
        assert_eq!(window.len_days(), 6);
    }

    #[test]
    fn cycle_selector_matching() {
        assert!(CycleSelector::All.matches(1));
        assert!(CycleSelector::All.matches(99));
        let only = CycleSelector::Only(vec![1, 2, 3, 4]);
        assert!(only.matches(4));
        assert!(!only.matches(5));
    }

    #[test]
    fn catalog_lookup_by_code() {
        let catalog = RegimenCatalog::new(vec![Regimen {
            code: "AC-T".into(),
            name: "Doxorubicin/Cyclophosphamide then Paclitaxel".into(),
            cycle_length_days: 21,
            nadir_window: Some(NadirWindow {
                start_day: 7,
                end_day: 12,
            }),
            toxicity: ToxicityProfile::default(),
            composition: None,
            drug_components: vec![],
        }]);
        assert!(catalog.get("AC-T").is_some());
        assert!(catalog.get("FOLFOX").is_none());
    }
}
