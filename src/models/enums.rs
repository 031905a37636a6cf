use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EngineError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(CyclePhase {
    PreSession => "pre_session",
    PostSession => "post_session",
    Recovery => "recovery",
    Nadir => "nadir",
    InterCycle => "inter_cycle",
});

impl CyclePhase {
    /// All five phases, in declaration order.
    pub const ALL: [CyclePhase; 5] = [
        Self::PreSession,
        Self::PostSession,
        Self::Recovery,
        Self::Nadir,
        Self::InterCycle,
    ];
}

str_enum!(ItemAttribute {
    Frequency => "frequency",
    Severity => "severity",
    Interference => "interference",
    PresentAbsent => "present_absent",
    Amount => "amount",
});

impl ItemAttribute {
    /// Whether this attribute establishes presence/frequency of a symptom.
    /// `present_absent` and `amount` take that role when the catalog
    /// defines them for a symptom; `frequency` otherwise.
    pub fn is_presence_class(&self) -> bool {
        matches!(self, Self::Frequency | Self::PresentAbsent | Self::Amount)
    }
}

str_enum!(SymptomTrend {
    Improving => "improving",
    Worsening => "worsening",
    Stable => "stable",
});

str_enum!(AlertSeverity {
    Red => "red",
    Yellow => "yellow",
    Green => "green",
});

impl AlertSeverity {
    /// Sort rank: red before yellow before green.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Yellow => 2,
            Self::Green => 3,
        }
    }
}

str_enum!(AlertType {
    Emergency => "emergency",
    Urgent => "urgent",
    Routine => "routine",
    ConcerningTrend => "concerning_trend",
});

str_enum!(NadirPhase {
    None => "none",
    Early => "early",
    Peak => "peak",
    Late => "late",
});

str_enum!(InfectionRisk {
    Low => "low",
    Moderate => "moderate",
    High => "high",
    VeryHigh => "very_high",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn phase_round_trips_through_str() {
        for phase in CyclePhase::ALL {
            assert_eq!(CyclePhase::from_str(phase.as_str()).unwrap(), phase);
        }
    }

    #[test]
    fn unknown_phase_is_structured_error() {
        let err = CyclePhase::from_str("mid_cycle").unwrap_err();
        match err {
            EngineError::InvalidEnum { field, value } => {
                assert_eq!(field, "CyclePhase");
                assert_eq!(value, "mid_cycle");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn severity_rank_orders_red_first() {
        assert!(AlertSeverity::Red.rank() < AlertSeverity::Yellow.rank());
        assert!(AlertSeverity::Yellow.rank() < AlertSeverity::Green.rank());
    }

    #[test]
    fn presence_class_attributes() {
        assert!(ItemAttribute::Frequency.is_presence_class());
        assert!(ItemAttribute::PresentAbsent.is_presence_class());
        assert!(ItemAttribute::Amount.is_presence_class());
        assert!(!ItemAttribute::Severity.is_presence_class());
        assert!(!ItemAttribute::Interference.is_presence_class());
    }

    #[test]
    fn snake_case_serde_matches_as_str() {
        let json = serde_json::to_string(&ItemAttribute::PresentAbsent).unwrap();
        assert_eq!(json, "\"present_absent\"");
        let back: ItemAttribute = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemAttribute::PresentAbsent);
    }
}
