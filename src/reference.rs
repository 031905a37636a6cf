//! Reference-data loading: the symptom-item catalog, the drug-module
//! catalog, and regimen definitions. Loaded once at startup from bundled
//! JSON files, independently of any single request, and injected into
//! the engine as read-only values.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::EngineError;
use crate::models::enums::{CyclePhase, ItemAttribute};
use crate::models::{
    CompositionStep, CycleSelector, DrugComposition, DrugModule, DrugModuleCatalog, ItemCatalog,
    NadirWindow, Regimen, RegimenCatalog, SafetyProxyItem, ScalePoint, SymptomItem,
    ToxicityProfile,
};

/// Loaded reference data for the decision engine.
#[derive(Debug)]
pub struct ReferenceData {
    pub items: ItemCatalog,
    pub drug_modules: DrugModuleCatalog,
    pub regimens: RegimenCatalog,
}

impl ReferenceData {
    /// Load reference data from bundled JSON files.
    pub fn load(resources_dir: &Path) -> Result<Self, EngineError> {
        let items: Vec<SymptomItem> = read_json(resources_dir, "symptom_items.json")?;
        let modules: Vec<DrugModule> = read_json(resources_dir, "drug_modules.json")?;
        let regimens: Vec<Regimen> = read_json(resources_dir, "regimens.json")?;

        Ok(Self {
            items: ItemCatalog::new(items),
            drug_modules: DrugModuleCatalog::new(modules),
            regimens: RegimenCatalog::new(regimens),
        })
    }

    /// Create reference data for tests (no file I/O): a realistic
    /// PRO-CTCAE-style item subset, two regimens, and five drug modules.
    pub fn load_test() -> Self {
        Self {
            items: ItemCatalog::new(test_items()),
            drug_modules: DrugModuleCatalog::new(test_drug_modules()),
            regimens: RegimenCatalog::new(test_regimens()),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    dir: &Path,
    file_name: &str,
) -> Result<T, EngineError> {
    let path = dir.join(file_name);
    let json = std::fs::read_to_string(&path)
        .map_err(|e| EngineError::ReferenceDataLoad(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&json)
        .map_err(|e| EngineError::ReferenceDataParse(file_name.into(), e.to_string()))
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

fn scale(labels: &[&str]) -> Vec<ScalePoint> {
    labels
        .iter()
        .enumerate()
        .map(|(value, label)| ScalePoint {
            value: value as u8,
            label: (*label).to_string(),
        })
        .collect()
}

fn frequency_scale() -> Vec<ScalePoint> {
    scale(&["Never", "Rarely", "Occasionally", "Frequently", "Almost constantly"])
}

fn severity_scale() -> Vec<ScalePoint> {
    scale(&["None", "Mild", "Moderate", "Severe", "Very severe"])
}

fn interference_scale() -> Vec<ScalePoint> {
    scale(&["Not at all", "A little bit", "Somewhat", "Quite a bit", "Very much"])
}

fn yes_no_scale() -> Vec<ScalePoint> {
    scale(&["No", "Yes"])
}

fn amount_scale() -> Vec<ScalePoint> {
    scale(&["None", "A little", "Some", "A lot", "Very much"])
}

fn item(symptom: &str, attribute: ItemAttribute, question: &str) -> SymptomItem {
    let scale = match attribute {
        ItemAttribute::Frequency => frequency_scale(),
        ItemAttribute::Severity => severity_scale(),
        ItemAttribute::Interference => interference_scale(),
        ItemAttribute::PresentAbsent => yes_no_scale(),
        ItemAttribute::Amount => amount_scale(),
    };
    SymptomItem {
        id: format!("{symptom}_{}", attribute.as_str()),
        symptom: symptom.into(),
        attribute,
        question: question.into(),
        scale,
    }
}

fn test_items() -> Vec<SymptomItem> {
    use ItemAttribute::*;
    vec![
        item("nausea", Frequency, "How often did you have nausea?"),
        item("nausea", Severity, "At its worst, how severe was your nausea?"),
        item("nausea", Interference, "How much did nausea interfere with your daily activities?"),
        item("vomiting", Frequency, "How often did you vomit?"),
        item("vomiting", Amount, "How much did you vomit?"),
        item("vomiting", Severity, "At its worst, how severe was your vomiting?"),
        item("fatigue", Severity, "At its worst, how severe was your fatigue?"),
        item("fatigue", Interference, "How much did fatigue interfere with your daily activities?"),
        item("fever", PresentAbsent, "Have you had a fever (38\u{00b0}C / 100.4\u{00b0}F or higher)?"),
        item("fever", Severity, "At its worst, how severe was your fever?"),
        item("chills", PresentAbsent, "Have you had chills or shivering?"),
        item("chills", Severity, "At their worst, how severe were your chills?"),
        item("bleeding", PresentAbsent, "Have you had any unusual bleeding?"),
        item("bruising", PresentAbsent, "Have you noticed unusual bruising?"),
        item("infection_signs", PresentAbsent, "Do you have signs of infection (redness, swelling, pus, sore throat)?"),
        item("shortness_of_breath", PresentAbsent, "Have you had shortness of breath?"),
        item("shortness_of_breath", Severity, "At its worst, how severe was your shortness of breath?"),
        item("dizziness", Frequency, "How often did you feel dizzy?"),
        item("dizziness", Severity, "At its worst, how severe was your dizziness?"),
        item("dizziness", Interference, "How much did dizziness interfere with your daily activities?"),
        item("mouth_sores", PresentAbsent, "Do you have sores in your mouth or throat?"),
        item("mouth_sores", Severity, "At their worst, how severe were your mouth or throat sores?"),
        item("mouth_sores", Interference, "How much did mouth or throat sores interfere with eating or drinking?"),
        item("diarrhea", Frequency, "How often did you have loose or watery stools?"),
        item("diarrhea", Interference, "How much did diarrhea interfere with your daily activities?"),
        item("constipation", Frequency, "How often were you constipated?"),
        item("constipation", Severity, "At its worst, how severe was your constipation?"),
        item("appetite_loss", Amount, "How much was your appetite decreased?"),
        item("appetite_loss", Severity, "At its worst, how severe was your decreased appetite?"),
        item("appetite_loss", Interference, "How much did decreased appetite interfere with eating?"),
        item("numbness_tingling", Severity, "At its worst, how severe was numbness or tingling in your hands or feet?"),
        item("numbness_tingling", Interference, "How much did numbness or tingling interfere with your daily activities?"),
        item("pain", Frequency, "How often did you have pain?"),
        item("pain", Severity, "At its worst, how severe was your pain?"),
        item("pain", Interference, "How much did pain interfere with your daily activities?"),
        item("chest_pain", PresentAbsent, "Have you had chest pain?"),
        item("chest_pain", Severity, "At its worst, how severe was your chest pain?"),
        item("confusion", PresentAbsent, "Have you felt confused or disoriented?"),
        item("skin_changes", PresentAbsent, "Have you noticed rash, peeling, or other skin changes?"),
        item("skin_changes", Severity, "At their worst, how severe were your skin changes?"),
        item("anxiety", Frequency, "How often did you feel anxious?"),
        item("anxiety", Severity, "At its worst, how severe was your anxiety?"),
        item("anxiety", Interference, "How much did anxiety interfere with your daily activities?"),
    ]
}

fn phase_set(phases: &[CyclePhase]) -> HashSet<CyclePhase> {
    phases.iter().copied().collect()
}

fn test_drug_modules() -> Vec<DrugModule> {
    vec![
        DrugModule {
            drug_name: "doxorubicin".into(),
            drug_class: "anthracycline".into(),
            symptoms: vec![
                "nausea".into(),
                "vomiting".into(),
                "fatigue".into(),
                "mouth_sores".into(),
                "appetite_loss".into(),
            ],
            safety_proxies: vec![
                SafetyProxyItem {
                    monitoring_type: "neutropenia".into(),
                    proxy_symptoms: vec![
                        "fever".into(),
                        "infection_signs".into(),
                        "chills".into(),
                    ],
                    rationale: "Febrile neutropenia can be the first visible sign of marrow suppression.".into(),
                },
                SafetyProxyItem {
                    monitoring_type: "cardiotoxicity".into(),
                    proxy_symptoms: vec!["shortness_of_breath".into(), "chest_pain".into()],
                    rationale: "Anthracycline cardiomyopathy presents as exertional dyspnea before imaging changes.".into(),
                },
            ],
            phase_rules: HashMap::from([(
                "mouth_sores".into(),
                phase_set(&[CyclePhase::Recovery, CyclePhase::Nadir]),
            )]),
            myelosuppressive: true,
        },
        DrugModule {
            drug_name: "cyclophosphamide".into(),
            drug_class: "alkylating agent".into(),
            symptoms: vec!["nausea".into(), "vomiting".into(), "fatigue".into()],
            safety_proxies: vec![SafetyProxyItem {
                monitoring_type: "neutropenia".into(),
                proxy_symptoms: vec!["fever".into(), "infection_signs".into()],
                rationale: "Dose-dependent marrow suppression peaks in the nadir window.".into(),
            }],
            phase_rules: HashMap::new(),
            myelosuppressive: true,
        },
        DrugModule {
            drug_name: "paclitaxel".into(),
            drug_class: "taxane".into(),
            symptoms: vec![
                "numbness_tingling".into(),
                "pain".into(),
                "fatigue".into(),
            ],
            safety_proxies: vec![SafetyProxyItem {
                monitoring_type: "hypersensitivity".into(),
                proxy_symptoms: vec!["skin_changes".into(), "shortness_of_breath".into()],
                rationale: "Infusion reactions can recur up to 48h after exposure.".into(),
            }],
            phase_rules: HashMap::from([(
                "numbness_tingling".into(),
                phase_set(&[CyclePhase::PreSession, CyclePhase::InterCycle]),
            )]),
            myelosuppressive: true,
        },
        DrugModule {
            drug_name: "oxaliplatin".into(),
            drug_class: "platinum compound".into(),
            symptoms: vec!["numbness_tingling".into(), "nausea".into()],
            safety_proxies: vec![SafetyProxyItem {
                monitoring_type: "neutropenia".into(),
                proxy_symptoms: vec!["fever".into()],
                rationale: "Neutropenic sepsis risk during the count nadir.".into(),
            }],
            phase_rules: HashMap::from([(
                "numbness_tingling".into(),
                phase_set(&[CyclePhase::PostSession]),
            )]),
            myelosuppressive: true,
        },
        DrugModule {
            drug_name: "fluorouracil".into(),
            drug_class: "antimetabolite".into(),
            symptoms: vec![
                "diarrhea".into(),
                "mouth_sores".into(),
                "appetite_loss".into(),
            ],
            safety_proxies: vec![SafetyProxyItem {
                monitoring_type: "cardiotoxicity".into(),
                proxy_symptoms: vec!["chest_pain".into()],
                rationale: "Coronary vasospasm is a recognized fluoropyrimidine toxicity.".into(),
            }],
            phase_rules: HashMap::new(),
            myelosuppressive: false,
        },
    ]
}

fn test_regimens() -> Vec<Regimen> {
    vec![
        Regimen {
            code: "AC-T".into(),
            name: "Doxorubicin/Cyclophosphamide followed by Paclitaxel".into(),
            cycle_length_days: 21,
            nadir_window: Some(NadirWindow {
                start_day: 7,
                end_day: 12,
            }),
            toxicity: ToxicityProfile {
                high_risk: Some(vec![
                    "nausea".into(),
                    "vomiting".into(),
                    "fatigue".into(),
                    "fever".into(),
                    "chills".into(),
                    "infection_signs".into(),
                    "mouth_sores".into(),
                    "bleeding".into(),
                    "bruising".into(),
                    "numbness_tingling".into(),
                    "appetite_loss".into(),
                ]),
                moderate_risk: vec!["constipation".into(), "anxiety".into()],
                low_risk: vec!["skin_changes".into()],
                phase_priorities: None,
            },
            composition: Some(DrugComposition {
                steps: vec![
                    CompositionStep {
                        name: "AC".into(),
                        drugs: vec!["doxorubicin".into(), "cyclophosphamide".into()],
                        cycles: CycleSelector::Only(vec![1, 2, 3, 4]),
                    },
                    CompositionStep {
                        name: "T".into(),
                        drugs: vec!["paclitaxel".into()],
                        cycles: CycleSelector::Only(vec![5, 6, 7, 8]),
                    },
                ],
            }),
            drug_components: vec![
                "doxorubicin".into(),
                "cyclophosphamide".into(),
                "paclitaxel".into(),
            ],
        },
        Regimen {
            code: "FOLFOX".into(),
            name: "Oxaliplatin + Fluorouracil/Leucovorin".into(),
            cycle_length_days: 14,
            nadir_window: Some(NadirWindow {
                start_day: 5,
                end_day: 9,
            }),
            toxicity: ToxicityProfile {
                high_risk: Some(vec![
                    "diarrhea".into(),
                    "numbness_tingling".into(),
                    "nausea".into(),
                    "mouth_sores".into(),
                    "fever".into(),
                    "infection_signs".into(),
                ]),
                moderate_risk: vec!["fatigue".into(), "appetite_loss".into()],
                low_risk: vec![],
                phase_priorities: Some(HashMap::from([
                    (
                        CyclePhase::PostSession,
                        vec!["nausea".into(), "numbness_tingling".into(), "diarrhea".into()],
                    ),
                    (
                        CyclePhase::Nadir,
                        vec!["fever".into(), "infection_signs".into(), "diarrhea".into()],
                    ),
                ])),
            },
            composition: Some(DrugComposition {
                steps: vec![CompositionStep {
                    name: "FOLFOX".into(),
                    drugs: vec!["oxaliplatin".into(), "fluorouracil".into()],
                    cycles: CycleSelector::All,
                }],
            }),
            drug_components: vec!["oxaliplatin".into(), "fluorouracil".into()],
        },
    ]
}
