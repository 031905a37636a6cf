//! Composite symptom grading: the validated algorithm converting
//! grouped per-symptom answers into a 0-4 severity grade.
//!
//! Every grading step appends a human-readable clause to the rationale
//! trail. The trail is part of the contract: clinicians audit how a
//! grade was reached, not just the number.

use serde::{Deserialize, Serialize};

use crate::branching::AnswerState;
use crate::error::EngineError;
use crate::models::enums::{ItemAttribute, SymptomTrend};
use crate::models::ItemCatalog;

/// Grouped answers for one symptom. Presence-class answers
/// (`present_absent`, `amount`) occupy the frequency slot; when a
/// symptom carries more than one presence-class answer, the highest
/// wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomResponses {
    pub symptom: String,
    pub frequency: Option<u8>,
    pub severity: Option<u8>,
    pub interference: Option<u8>,
}

/// Output of the grading engine for one symptom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    pub symptom: String,
    /// Composite grade, 0-4.
    pub grade: u8,
    /// The raw component scores the grade was derived from.
    pub responses: SymptomResponses,
    /// Auditable explanation, one clause per grading step.
    pub rationale: Vec<String>,
}

/// One message per violated constraint; empty when the input is valid.
pub fn validate_responses(responses: &SymptomResponses) -> Vec<String> {
    let mut violations = Vec::new();
    for (name, value) in [
        ("frequency", responses.frequency),
        ("severity", responses.severity),
        ("interference", responses.interference),
    ] {
        if let Some(v) = value {
            if v > 4 {
                violations.push(format!(
                    "{}: {name} {v} outside [0,4]",
                    responses.symptom
                ));
            }
        }
    }
    violations
}

/// Apply the composite-grading algorithm to one symptom's grouped
/// answers. Grading never proceeds on invalid input.
pub fn calculate_composite_grade(
    responses: &SymptomResponses,
) -> Result<GradingResult, EngineError> {
    let violations = validate_responses(responses);
    if !violations.is_empty() {
        return Err(EngineError::InvalidGradingInput(violations));
    }

    let mut rationale = Vec::new();

    let frequency = responses.frequency;
    let severity = responses.severity;
    let interference = responses.interference;

    if frequency.is_none() && severity.is_none() && interference.is_none() {
        rationale.push("no symptom reported".to_string());
        return Ok(GradingResult {
            symptom: responses.symptom.clone(),
            grade: 0,
            responses: responses.clone(),
            rationale,
        });
    }

    let mut grade = match (frequency, severity) {
        (Some(f), Some(s)) => {
            let base = f.max(s);
            rationale.push(format!(
                "base grade {base} = max(frequency {f}, severity {s})"
            ));
            base
        }
        (Some(f), None) => {
            rationale.push(format!("only frequency reported; base grade {f}"));
            f
        }
        (None, Some(s)) => {
            rationale.push(format!("only severity reported; base grade {s}"));
            s
        }
        (None, None) => {
            rationale.push("no frequency or severity reported; base grade 0".to_string());
            0
        }
    };

    if let (Some(f), Some(s)) = (frequency, severity) {
        if f >= 3 && s >= 3 {
            grade += 1;
            rationale.push(format!(
                "frequency and severity both 3 or higher; grade escalated to {grade}"
            ));
        }
    }

    if let Some(i) = interference {
        if i >= 3 {
            grade += 1;
            rationale.push(format!(
                "interference {i} is 3 or higher; grade escalated to {grade}"
            ));
        }
    }

    if grade > 4 {
        grade = 4;
        rationale.push("grade clamped to maximum 4".to_string());
    }

    Ok(GradingResult {
        symptom: responses.symptom.clone(),
        grade,
        responses: responses.clone(),
        rationale,
    })
}

/// Group answered catalog items into per-symptom responses, in
/// first-seen order. An answer whose item id cannot be mapped to the
/// catalog is fatal. A missing grade on a reported symptom is a
/// patient-safety gap, never something to drop silently.
pub fn group_responses(
    catalog: &ItemCatalog,
    answers: &AnswerState,
) -> Result<Vec<SymptomResponses>, EngineError> {
    let mut groups: Vec<SymptomResponses> = Vec::new();

    for (item_id, value) in answers.iter() {
        let item = catalog
            .by_id(item_id)
            .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;
        if item.symptom.trim().is_empty() {
            return Err(EngineError::UngradableSymptom(item_id.to_string()));
        }

        let idx = match groups.iter().position(|g| g.symptom == item.symptom) {
            Some(idx) => idx,
            None => {
                groups.push(SymptomResponses {
                    symptom: item.symptom.clone(),
                    ..Default::default()
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];

        match item.attribute {
            ItemAttribute::Frequency | ItemAttribute::PresentAbsent | ItemAttribute::Amount => {
                group.frequency = Some(group.frequency.map_or(value, |v| v.max(value)));
            }
            ItemAttribute::Severity => group.severity = Some(value),
            ItemAttribute::Interference => group.interference = Some(value),
        }
    }

    Ok(groups)
}

/// Completion path: group and grade every answered symptom. A submission
/// with zero answered attributes is a validation failure.
pub fn grade_submission(
    catalog: &ItemCatalog,
    answers: &AnswerState,
) -> Result<Vec<GradingResult>, EngineError> {
    if answers.is_empty() {
        return Err(EngineError::InvalidGradingInput(vec![
            "no answered attributes supplied".to_string(),
        ]));
    }

    let groups = group_responses(catalog, answers)?;
    let mut results = Vec::with_capacity(groups.len());
    for group in &groups {
        results.push(calculate_composite_grade(group)?);
    }

    tracing::info!(
        symptoms = results.len(),
        max_grade = highest_grade(&results).unwrap_or(0),
        "Submission graded"
    );

    Ok(results)
}

// ---------------------------------------------------------------------------
// Derived utilities
// ---------------------------------------------------------------------------

pub fn highest_grade(results: &[GradingResult]) -> Option<u8> {
    results.iter().map(|r| r.grade).max()
}

pub fn filter_by_min_grade(results: &[GradingResult], min_grade: u8) -> Vec<&GradingResult> {
    results.iter().filter(|r| r.grade >= min_grade).collect()
}

/// Weight of each grade in the toxicity-burden score.
pub const BURDEN_WEIGHTS: [f64; 5] = [0.0, 3.0, 8.0, 15.0, 25.0];

/// 0-100 toxicity burden: `min(100, Σ weight[grade] / 200 × 100)`.
pub fn toxicity_burden(results: &[GradingResult]) -> f64 {
    let weighted: f64 = results
        .iter()
        .map(|r| BURDEN_WEIGHTS[r.grade.min(4) as usize])
        .sum();
    (weighted / 200.0 * 100.0).min(100.0)
}

/// Compare two composite grades of the same symptom across reports.
pub fn classify_trend(previous_grade: u8, current_grade: u8) -> SymptomTrend {
    match current_grade.cmp(&previous_grade) {
        std::cmp::Ordering::Greater => SymptomTrend::Worsening,
        std::cmp::Ordering::Less => SymptomTrend::Improving,
        std::cmp::Ordering::Equal => SymptomTrend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;

    fn responses(
        frequency: Option<u8>,
        severity: Option<u8>,
        interference: Option<u8>,
    ) -> SymptomResponses {
        SymptomResponses {
            symptom: "nausea".into(),
            frequency,
            severity,
            interference,
        }
    }

    #[test]
    fn empty_group_grades_zero() {
        let result = calculate_composite_grade(&responses(None, None, None)).unwrap();
        assert_eq!(result.grade, 0);
        assert_eq!(result.rationale, vec!["no symptom reported"]);
    }

    #[test]
    fn base_is_max_of_frequency_and_severity() {
        let result = calculate_composite_grade(&responses(Some(2), Some(2), None)).unwrap();
        assert_eq!(result.grade, 2);

        let result = calculate_composite_grade(&responses(Some(1), Some(3), None)).unwrap();
        assert_eq!(result.grade, 3);
    }

    #[test]
    fn single_component_grades_alone() {
        assert_eq!(
            calculate_composite_grade(&responses(Some(3), None, None))
                .unwrap()
                .grade,
            3
        );
        assert_eq!(
            calculate_composite_grade(&responses(None, Some(2), None))
                .unwrap()
                .grade,
            2
        );
    }

    #[test]
    fn dual_escalation_caps_at_four() {
        // Base 3, +1 for both >=3, interference escalation cannot push
        // past the clamp.
        let result = calculate_composite_grade(&responses(Some(3), Some(3), Some(4))).unwrap();
        assert_eq!(result.grade, 4);
        assert!(result
            .rationale
            .iter()
            .any(|r| r.contains("clamped to maximum 4")));
    }

    #[test]
    fn interference_escalates_after_base() {
        let result = calculate_composite_grade(&responses(Some(2), Some(1), Some(3))).unwrap();
        assert_eq!(result.grade, 3);
        assert!(result
            .rationale
            .iter()
            .any(|r| r.contains("interference 3")));
    }

    #[test]
    fn interference_alone_grades_one() {
        let result = calculate_composite_grade(&responses(None, None, Some(3))).unwrap();
        assert_eq!(result.grade, 1);
    }

    #[test]
    fn monotone_in_each_component() {
        let mut previous = 0;
        for f in 0..=4 {
            let grade = calculate_composite_grade(&responses(Some(f), Some(2), Some(2)))
                .unwrap()
                .grade;
            assert!(grade >= previous);
            assert!(grade <= 4);
            previous = grade;
        }
    }

    #[test]
    fn out_of_range_values_are_rejected_per_constraint() {
        let err = calculate_composite_grade(&responses(Some(7), Some(9), None)).unwrap_err();
        match err {
            EngineError::InvalidGradingInput(violations) => {
                assert_eq!(violations.len(), 2);
                assert!(violations[0].contains("frequency 7"));
                assert!(violations[1].contains("severity 9"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rationale_traces_every_step() {
        let result = calculate_composite_grade(&responses(Some(3), Some(4), Some(3))).unwrap();
        assert_eq!(result.rationale.len(), 4);
        assert!(result.rationale[0].contains("base grade 4"));
        assert!(result.rationale[1].contains("both 3 or higher"));
        assert!(result.rationale[2].contains("interference 3"));
        assert!(result.rationale[3].contains("clamped"));
    }

    #[test]
    fn grouping_merges_presence_class_answers() {
        let data = ReferenceData::load_test();
        let mut answers = AnswerState::new();
        answers.record("vomiting_frequency", 1);
        answers.record("vomiting_amount", 3);
        answers.record("vomiting_severity", 2);

        let groups = group_responses(&data.items, &answers).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].frequency, Some(3));
        assert_eq!(groups[0].severity, Some(2));
    }

    #[test]
    fn unmapped_answer_is_fatal() {
        let data = ReferenceData::load_test();
        let mut answers = AnswerState::new();
        answers.record("nausea_frequency", 2);
        answers.record("ghost_item", 1);

        let err = grade_submission(&data.items, &answers).unwrap_err();
        assert!(matches!(err, EngineError::ItemNotFound(id) if id == "ghost_item"));
    }

    #[test]
    fn empty_submission_is_rejected() {
        let data = ReferenceData::load_test();
        let err = grade_submission(&data.items, &AnswerState::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGradingInput(_)));
    }

    #[test]
    fn submission_produces_one_result_per_symptom() {
        let data = ReferenceData::load_test();
        let mut answers = AnswerState::new();
        answers.record("nausea_frequency", 3);
        answers.record("nausea_severity", 3);
        answers.record("nausea_interference", 4);
        answers.record("fever_present_absent", 1);
        answers.record("fever_severity", 2);

        let results = grade_submission(&data.items, &answers).unwrap();
        assert_eq!(results.len(), 2);
        let nausea = results.iter().find(|r| r.symptom == "nausea").unwrap();
        assert_eq!(nausea.grade, 4);
        let fever = results.iter().find(|r| r.symptom == "fever").unwrap();
        assert_eq!(fever.grade, 2);
    }

    #[test]
    fn burden_score_weights_and_cap() {
        let make = |grade: u8| GradingResult {
            symptom: "s".into(),
            grade,
            responses: SymptomResponses::default(),
            rationale: vec![],
        };
        // One grade-4 symptom: 25 / 200 * 100 = 12.5.
        assert_eq!(toxicity_burden(&[make(4)]), 12.5);
        // Eight grade-4 symptoms: 200/200*100 = 100; nine caps at 100.
        let eight: Vec<GradingResult> = (0..8).map(|_| make(4)).collect();
        assert_eq!(toxicity_burden(&eight), 100.0);
        let nine: Vec<GradingResult> = (0..9).map(|_| make(4)).collect();
        assert_eq!(toxicity_burden(&nine), 100.0);
        assert_eq!(toxicity_burden(&[]), 0.0);
    }

    #[test]
    fn trend_classification() {
        assert_eq!(classify_trend(1, 3), SymptomTrend::Worsening);
        assert_eq!(classify_trend(3, 1), SymptomTrend::Improving);
        assert_eq!(classify_trend(2, 2), SymptomTrend::Stable);
    }

    #[test]
    fn highest_and_filter_utilities() {
        let make = |symptom: &str, grade: u8| GradingResult {
            symptom: symptom.into(),
            grade,
            responses: SymptomResponses::default(),
            rationale: vec![],
        };
        let results = vec![make("nausea", 2), make("fever", 4), make("fatigue", 1)];
        assert_eq!(highest_grade(&results), Some(4));
        assert_eq!(filter_by_min_grade(&results, 2).len(), 2);
        assert_eq!(highest_grade(&[]), None);
    }
}
