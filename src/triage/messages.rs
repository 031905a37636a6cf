/// Message template builder for alert instruction text. Patient-facing
/// wording stays calm and action-oriented; clinician-facing wording
/// leads with the grade and rule that fired.
pub struct MessageTemplates;

impl MessageTemplates {
    pub fn display_symptom(symptom: &str) -> String {
        symptom.replace('_', " ")
    }

    pub fn emergency_patient(symptom: &str) -> String {
        format!(
            "Your report about {} needs urgent attention. \
             Please contact your care team right away, day or night.",
            Self::display_symptom(symptom),
        )
    }

    pub fn emergency_clinician(symptom: &str, grade: u8) -> String {
        format!(
            "Grade {} {} reported; emergency threshold met. Contact the patient immediately.",
            grade,
            Self::display_symptom(symptom),
        )
    }

    pub fn neutropenic_fever_patient() -> String {
        "You reported a fever during the days when your blood counts are \
         lowest. This needs to be checked today. Please contact your care \
         team right away."
            .to_string()
    }

    pub fn neutropenic_fever_clinician(grade: u8) -> String {
        format!(
            "Grade {grade} fever reported inside the nadir window. \
             Treat as suspected febrile neutropenia until ruled out.",
        )
    }

    pub fn urgent_patient(symptom: &str) -> String {
        format!(
            "Your report about {} should be reviewed soon. \
             Your care team will contact you within a day.",
            Self::display_symptom(symptom),
        )
    }

    pub fn urgent_clinician(symptom: &str, grade: u8) -> String {
        format!(
            "Grade {} {} reported. Review within 24 hours.",
            grade,
            Self::display_symptom(symptom),
        )
    }

    pub fn trend_patient(symptom: &str) -> String {
        format!(
            "Your {} has been getting worse between reports. \
             Your care team will take a closer look.",
            Self::display_symptom(symptom),
        )
    }

    pub fn trend_clinician(symptom: &str, grade: u8) -> String {
        format!(
            "Grade {} {} with a worsening trend across reports.",
            grade,
            Self::display_symptom(symptom),
        )
    }

    pub fn multiple_moderate_patient(count: usize) -> String {
        format!(
            "You reported {count} moderate symptoms at the same time. \
             Your care team will review the combination.",
        )
    }

    pub fn multiple_moderate_clinician(count: usize) -> String {
        format!(
            "{count} concurrent grade-2 symptoms reported. \
             Review the combined toxicity burden.",
        )
    }
}
