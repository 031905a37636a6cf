use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grading::GradingResult;
use crate::models::enums::{AlertSeverity, AlertType, SymptomTrend};
use crate::models::HistoryIndex;
use crate::timeline::TreatmentContext;

use super::messages::MessageTemplates;

/// Grade-3 reports of these symptoms escalate to emergency.
pub const EMERGENCY_SYMPTOMS: &[&str] = &[
    "fever",
    "infection_signs",
    "bleeding",
    "shortness_of_breath",
    "chest_pain",
    "confusion",
];

/// How many concurrent grade-2 symptoms trigger the combined alert.
pub const MODERATE_CLUSTER_THRESHOLD: usize = 3;

/// One alert for clinician review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub severity: AlertSeverity,
    pub alert_type: AlertType,
    /// The triggering symptom term. The combined moderate-cluster alert
    /// uses `"multiple_moderate_symptoms"`.
    pub symptom: String,
    pub grade: u8,
    pub patient_message: String,
    pub clinician_message: String,
    pub requires_immediate_action: bool,
}

fn make_alert(
    severity: AlertSeverity,
    alert_type: AlertType,
    symptom: &str,
    grade: u8,
    patient_message: String,
    clinician_message: String,
) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        severity,
        alert_type,
        symptom: symptom.to_string(),
        grade,
        patient_message,
        clinician_message,
        requires_immediate_action: severity == AlertSeverity::Red,
    }
}

/// Derive per-symptom alerts from grading results.
///
/// Grade 4 is always an emergency. Grade 3 is an emergency when the
/// symptom is on the fixed emergency list, or when it is fever inside
/// the nadir window (the neutropenic-fever override applies regardless
/// of list membership); otherwise urgent. Grade 2 with a worsening
/// trend raises a concerning-trend alert. Three or more concurrent
/// grade-2 symptoms add one combined alert. Output is ordered red →
/// yellow → green, stable within each band.
pub fn derive_alerts(
    results: &[GradingResult],
    context: Option<&TreatmentContext>,
    history: &HistoryIndex,
) -> Vec<Alert> {
    let in_nadir_window = context.map_or(false, |c| c.in_nadir_window);
    let mut alerts = Vec::new();

    for result in results {
        let symptom = result.symptom.as_str();
        match result.grade {
            4 => alerts.push(make_alert(
                AlertSeverity::Red,
                AlertType::Emergency,
                symptom,
                result.grade,
                MessageTemplates::emergency_patient(symptom),
                MessageTemplates::emergency_clinician(symptom, result.grade),
            )),
            3 => {
                let neutropenic_fever = symptom == "fever" && in_nadir_window;
                let on_emergency_list = EMERGENCY_SYMPTOMS.contains(&symptom);
                if neutropenic_fever {
                    alerts.push(make_alert(
                        AlertSeverity::Red,
                        AlertType::Emergency,
                        symptom,
                        result.grade,
                        MessageTemplates::neutropenic_fever_patient(),
                        MessageTemplates::neutropenic_fever_clinician(result.grade),
                    ));
                } else if on_emergency_list {
                    alerts.push(make_alert(
                        AlertSeverity::Red,
                        AlertType::Emergency,
                        symptom,
                        result.grade,
                        MessageTemplates::emergency_patient(symptom),
                        MessageTemplates::emergency_clinician(symptom, result.grade),
                    ));
                } else {
                    alerts.push(make_alert(
                        AlertSeverity::Yellow,
                        AlertType::Urgent,
                        symptom,
                        result.grade,
                        MessageTemplates::urgent_patient(symptom),
                        MessageTemplates::urgent_clinician(symptom, result.grade),
                    ));
                }
            }
            2 => {
                let worsening = history
                    .get(symptom)
                    .map_or(false, |h| h.trend == SymptomTrend::Worsening);
                if worsening {
                    alerts.push(make_alert(
                        AlertSeverity::Yellow,
                        AlertType::ConcerningTrend,
                        symptom,
                        result.grade,
                        MessageTemplates::trend_patient(symptom),
                        MessageTemplates::trend_clinician(symptom, result.grade),
                    ));
                }
            }
            _ => {}
        }
    }

    let moderate_count = results.iter().filter(|r| r.grade == 2).count();
    if moderate_count >= MODERATE_CLUSTER_THRESHOLD {
        alerts.push(make_alert(
            AlertSeverity::Yellow,
            AlertType::ConcerningTrend,
            "multiple_moderate_symptoms",
            2,
            MessageTemplates::multiple_moderate_patient(moderate_count),
            MessageTemplates::multiple_moderate_clinician(moderate_count),
        ));
    }

    // Stable by band: red, yellow, green.
    alerts.sort_by_key(|a| a.severity.rank());

    tracing::info!(
        symptoms = results.len(),
        alerts = alerts.len(),
        red = alerts.iter().filter(|a| a.severity == AlertSeverity::Red).count(),
        "Alerts derived"
    );

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::SymptomResponses;
    use crate::models::SymptomHistory;
    use chrono::NaiveDate;

    fn graded(symptom: &str, grade: u8) -> GradingResult {
        GradingResult {
            symptom: symptom.into(),
            grade,
            responses: SymptomResponses::default(),
            rationale: vec![],
        }
    }

    fn nadir_context(in_nadir_window: bool) -> TreatmentContext {
        TreatmentContext {
            regimen_code: "AC-T".into(),
            cycle_number: 2,
            treatment_day: 9,
            absolute_treatment_day: 30,
            phase: crate::models::enums::CyclePhase::Nadir,
            in_nadir_window,
            last_infusion_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            next_infusion_date: None,
            days_until_next_infusion: 12,
        }
    }

    #[test]
    fn grade_four_is_always_emergency() {
        let alerts = derive_alerts(&[graded("fatigue", 4)], None, &HistoryIndex::empty());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Red);
        assert_eq!(alerts[0].alert_type, AlertType::Emergency);
        assert!(alerts[0].requires_immediate_action);
    }

    #[test]
    fn grade_three_splits_on_emergency_list() {
        let alerts = derive_alerts(
            &[graded("bleeding", 3), graded("nausea", 3)],
            None,
            &HistoryIndex::empty(),
        );
        let bleeding = alerts.iter().find(|a| a.symptom == "bleeding").unwrap();
        assert_eq!(bleeding.severity, AlertSeverity::Red);
        let nausea = alerts.iter().find(|a| a.symptom == "nausea").unwrap();
        assert_eq!(nausea.severity, AlertSeverity::Yellow);
        assert_eq!(nausea.alert_type, AlertType::Urgent);
        assert!(!nausea.requires_immediate_action);
    }

    #[test]
    fn neutropenic_fever_gets_dedicated_messaging() {
        let context = nadir_context(true);
        let alerts = derive_alerts(&[graded("fever", 3)], Some(&context), &HistoryIndex::empty());
        assert_eq!(alerts[0].severity, AlertSeverity::Red);
        assert!(alerts[0].clinician_message.contains("febrile neutropenia"));
    }

    #[test]
    fn nadir_override_applies_only_to_fever() {
        let context = nadir_context(true);
        // Vomiting is not on the emergency list; the nadir window does
        // not escalate it.
        let alerts = derive_alerts(
            &[graded("vomiting", 3)],
            Some(&context),
            &HistoryIndex::empty(),
        );
        assert_eq!(alerts[0].severity, AlertSeverity::Yellow);
    }

    #[test]
    fn grade_two_needs_worsening_trend() {
        let history = HistoryIndex::from_records(vec![SymptomHistory {
            symptom: "nausea".into(),
            last_grade: 1,
            trend: SymptomTrend::Worsening,
            last_reported: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        }]);
        let alerts = derive_alerts(&[graded("nausea", 2)], None, &history);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::ConcerningTrend);

        let quiet = derive_alerts(&[graded("nausea", 2)], None, &HistoryIndex::empty());
        assert!(quiet.is_empty());
    }

    #[test]
    fn grade_one_never_alerts() {
        let alerts = derive_alerts(&[graded("fatigue", 1)], None, &HistoryIndex::empty());
        assert!(alerts.is_empty());
    }

    #[test]
    fn three_moderate_symptoms_raise_cluster_alert() {
        let results = vec![graded("nausea", 2), graded("fatigue", 2), graded("pain", 2)];
        let alerts = derive_alerts(&results, None, &HistoryIndex::empty());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].symptom, "multiple_moderate_symptoms");
        assert_eq!(alerts[0].severity, AlertSeverity::Yellow);

        let two = derive_alerts(
            &[graded("nausea", 2), graded("fatigue", 2)],
            None,
            &HistoryIndex::empty(),
        );
        assert!(two.is_empty());
    }

    #[test]
    fn output_is_ordered_red_then_yellow() {
        let results = vec![
            graded("nausea", 3),   // yellow
            graded("fever", 4),    // red
            graded("fatigue", 3),  // yellow
            graded("bleeding", 3), // red
        ];
        let alerts = derive_alerts(&results, None, &HistoryIndex::empty());
        let ranks: Vec<u8> = alerts.iter().map(|a| a.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        // Stable within the red band: fever was seen before bleeding.
        assert_eq!(alerts[0].symptom, "fever");
        assert_eq!(alerts[1].symptom, "bleeding");
    }
}
