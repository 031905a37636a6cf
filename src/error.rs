use thiserror::Error;
use uuid::Uuid;

/// Failure taxonomy for the decision engine.
///
/// Missing reference data aborts the operation; the engine never
/// substitutes defaults for an absent treatment, regimen, cycle, or
/// catalog entry. Every variant carries enough structure for the caller
/// to build a precise user-facing message.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No active treatment for patient {0}")]
    NoActiveTreatment(Uuid),

    #[error("Unknown regimen: {0}")]
    UnknownRegimen(String),

    #[error("Treatment {0} has no current cycle")]
    NoCurrentCycle(Uuid),

    #[error("Item not found in catalog: {0}")]
    ItemNotFound(String),

    #[error("No drug module defined for {0}")]
    DrugModuleNotFound(String),

    #[error("Invalid {field}: {value}")]
    InvalidEnum { field: String, value: String },

    /// One message per violated constraint; grading never proceeds on
    /// invalid input.
    #[error("Grading input rejected: {}", .0.join("; "))]
    InvalidGradingInput(Vec<String>),

    /// A reported symptom that cannot be graded is a patient-safety gap,
    /// not something to drop.
    #[error("No grade could be derived for reported symptom '{0}'")]
    UngradableSymptom(String),

    #[error("Reference data load failed ({0}): {1}")]
    ReferenceDataLoad(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    ReferenceDataParse(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grading_rejection_joins_messages() {
        let err = EngineError::InvalidGradingInput(vec![
            "frequency 7 outside [0,4]".into(),
            "severity 9 outside [0,4]".into(),
        ]);
        let text = err.to_string();
        assert!(text.contains("frequency 7"));
        assert!(text.contains("severity 9"));
    }

    #[test]
    fn unknown_regimen_names_the_code() {
        let err = EngineError::UnknownRegimen("XYZ-9".into());
        assert_eq!(err.to_string(), "Unknown regimen: XYZ-9");
    }
}
